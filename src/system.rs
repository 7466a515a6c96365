//! Subprocess plumbing shared by the backends and notifiers.

pub mod executor;
pub mod parser;
pub mod ping;
