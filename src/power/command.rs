//! Command backend: user-supplied shell commands for status and actuation,
//! ping for liveness. Covers Wake-on-LAN tools, smart plugs, SSH shutdowns.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::config::types::{BackendSettings, CommandSettings};
use crate::power::types::ProbeResult;
use crate::power::PowerBackend;
use crate::system::{executor, ping};

const ACTUATION_TIMEOUT: Duration = Duration::from_secs(30);

pub struct CommandBackend {
    commands: CommandSettings,
    hostname: String,
    probe_timeout: Duration,
    dry_run: bool,
}

impl CommandBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        if settings.command.status.is_none() {
            return Err(anyhow!("command backend requires a status command"));
        }
        if settings.command.on.is_none() {
            return Err(anyhow!("command backend requires an on command"));
        }

        Ok(Self {
            commands: settings.command.clone(),
            hostname: settings.hostname.clone(),
            probe_timeout: settings.probe_timeout(),
            dry_run: settings.dry_run,
        })
    }

    async fn actuate(&self, label: &str, script: Option<&str>) -> Result<()> {
        let script = script.ok_or_else(|| anyhow!("Power {} is not supported by this backend", label))?;

        if self.dry_run {
            info!("[DRY RUN] Would execute: {}", script);
            return Ok(());
        }

        executor::run_checked(executor::build_shell_command(script), ACTUATION_TIMEOUT)
            .await
            .with_context(|| format!("Power {} command failed", label))?;
        Ok(())
    }
}

#[async_trait]
impl PowerBackend for CommandBackend {
    fn name(&self) -> &str {
        "command"
    }

    async fn probe_primary(&self) -> ProbeResult {
        let script = self
            .commands
            .status
            .as_deref()
            .ok_or_else(|| anyhow!("No status command configured"))?;

        let output = executor::run_with_timeout(executor::build_shell_command(script), self.probe_timeout)
            .await
            .context("Status command failed")?;

        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            code => Err(anyhow!(
                "Status command exited with {}: {}",
                code.unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            )),
        }
    }

    async fn probe_secondary(&self) -> ProbeResult {
        ping::ping(&self.hostname, self.probe_timeout).await
    }

    async fn power_on(&self) -> Result<()> {
        self.actuate("on", self.commands.on.as_deref()).await
    }

    async fn power_off(&self) -> Result<()> {
        self.actuate("off", self.commands.off.as_deref()).await
    }
}
