//! Subprocess executor for ipmitool, ping and user-supplied shell commands.
//! Every call is bounded by a timeout so a hung tool never stalls a probe round.

use std::process::Output;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::process::Command;
use tracing::{debug, trace};

use crate::config::types::IpmiSettings;

/// Environment variable that overrides the configured BMC password.
pub const IPMI_PASSWORD_ENV: &str = "POWER_IPMI_PASS";

/// Build an ipmitool Command with the correct interface flags.
/// A configured BMC host routes via LAN, otherwise the local /dev/ipmi0 interface is used.
pub fn build_ipmitool_command(settings: &IpmiSettings) -> std::process::Command {
    let mut cmd = std::process::Command::new("ipmitool");

    if let Some(host) = settings.host.as_deref() {
        debug!("IPMI routing to BMC: {}", host);
        cmd.args(["-I", "lanplus", "-H", host]);
        if let Some(user) = settings.username.as_deref() {
            cmd.args(["-U", user]);
        }
        let password = std::env::var(IPMI_PASSWORD_ENV).ok().or_else(|| settings.password.clone());
        if let Some(pass) = password {
            cmd.args(["-P", &pass]);
        }
    } else {
        cmd.args(["-I", "open"]);
    }

    cmd
}

/// Build a `sh -c <script>` command for user-configured actions.
pub fn build_shell_command(script: &str) -> std::process::Command {
    let mut cmd = std::process::Command::new("sh");
    cmd.arg("-c").arg(script);
    cmd
}

/// Run a command to completion, killing it if it outlives `timeout`.
/// A non-zero exit status is not an error here; callers interpret it.
pub async fn run_with_timeout(cmd: std::process::Command, timeout: Duration) -> Result<Output> {
    let program = cmd.get_program().to_string_lossy().to_string();
    trace!("Executing: {} {:?}", program, cmd.get_args().collect::<Vec<_>>());

    let mut cmd = Command::from(cmd);
    cmd.kill_on_drop(true);

    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(output) => output.with_context(|| format!("Failed to execute {}", program)),
        Err(_) => Err(anyhow!("{} timed out after {}ms", program, timeout.as_millis())),
    }
}

/// Run a command and require a zero exit status, returning its stdout.
pub async fn run_checked(cmd: std::process::Command, timeout: Duration) -> Result<String> {
    let program = cmd.get_program().to_string_lossy().to_string();
    let output = run_with_timeout(cmd, timeout).await?;

    if !output.status.success() {
        return Err(anyhow!(
            "{} failed (exit {}): {}",
            program,
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Execute `ipmitool chassis power <action>`.
pub async fn run_ipmitool_power(settings: &IpmiSettings, action: &str, timeout: Duration) -> Result<String> {
    let mut cmd = build_ipmitool_command(settings);
    cmd.args(["chassis", "power", action]);

    debug!("Executing: ipmitool chassis power {}", action);

    run_checked(cmd, timeout)
        .await
        .with_context(|| format!("ipmitool chassis power {} failed", action))
}
