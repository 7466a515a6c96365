//! PowerBackend trait definition and the built-in backends.

use anyhow::Result;
use async_trait::async_trait;

pub mod types;
pub mod state;
pub mod registry;
pub mod ipmi;
pub mod command;

pub use ipmi::ipmi_backend::IpmiBackend;
pub use command::CommandBackend;
pub use registry::BackendRegistry;

use types::ProbeResult;

/// A machine whose power can be queried through two independent signals
/// and switched through an actuator.
///
/// Probes must return within a bounded time; nothing upstream applies a
/// timeout to them.
#[async_trait]
pub trait PowerBackend: Send + Sync {
    /// Registry name of the backend ("ipmi", "command", ...)
    fn name(&self) -> &str;

    /// Primary signal, usually the power attribute reported by the machine or its BMC
    async fn probe_primary(&self) -> ProbeResult;

    /// Secondary signal, usually network liveness of the host
    async fn probe_secondary(&self) -> ProbeResult;

    /// Trigger power-on. Not idempotent: check the state first.
    async fn power_on(&self) -> Result<()>;

    /// Trigger power-off. Not idempotent: check the state first.
    async fn power_off(&self) -> Result<()>;
}
