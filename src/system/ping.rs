//! ICMP liveness probe through the system `ping` tool.

use std::time::Duration;

use anyhow::{anyhow, Context};
use tracing::trace;

use super::executor;
use crate::power::types::ProbeResult;

/// Send a single echo request and wait at most one second for the reply.
///
/// No reply (exit 1) means the host is down, which is a valid answer rather
/// than a probe failure. Anything else, including an unknown host, is an error.
pub async fn ping(host: &str, timeout: Duration) -> ProbeResult {
    let mut cmd = std::process::Command::new("ping");
    cmd.args(["-c", "1", "-W", "1", host]);

    let output = executor::run_with_timeout(cmd, timeout)
        .await
        .with_context(|| format!("Error sending ping to {}", host))?;

    trace!("ping {} exited with {:?}", host, output.status.code());

    match output.status.code() {
        Some(0) => Ok(true),
        Some(1) => Ok(false),
        code => Err(anyhow!(
            "ping {} failed (exit {}): {}",
            host,
            code.unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        )),
    }
}
