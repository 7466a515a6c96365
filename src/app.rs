//! Command-line front-end: argument parsing and logging setup.

pub mod cli;
pub mod logging;
