//! Dual-signal state evaluation.

use tracing::trace;

use super::types::StateSnapshot;
use super::PowerBackend;

/// Run both probes concurrently and wait for both, even if one fails early.
/// Each probe is called exactly once.
pub async fn evaluate(backend: &dyn PowerBackend) -> StateSnapshot {
    let (primary, secondary) = tokio::join!(backend.probe_primary(), backend.probe_secondary());

    trace!(
        "Evaluated {} backend: primary={:?} secondary={:?}",
        backend.name(),
        primary.as_ref().ok(),
        secondary.as_ref().ok()
    );

    StateSnapshot::new(primary, secondary)
}
