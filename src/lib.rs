//! `power-agent` library crate.
//!
//! Remote power control with adaptive startup monitoring. The binary
//! entrypoint lives in `main.rs`; modules are public for integration testing.

pub mod app;
pub mod config;
pub mod control;
pub mod monitor;
pub mod power;
pub mod system;
