//! Config file loading and validation.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use crate::config::types::AppConfig;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/power.d/config.json";

pub async fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        info!("Config file {:?} not found, using defaults", path);
        return Ok(AppConfig::default());
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    let config: AppConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;

    info!("Loaded configuration from: {:?}", path);
    Ok(config)
}

impl AppConfig {
    /// Reject configurations the selected backend cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.backend.hostname.trim().is_empty() {
            warn!("⚠️ backend.hostname is not configured. The liveness probe will fail.");
        }

        if self.backend.kind == "command" {
            if self.backend.command.status.is_none() {
                return Err(anyhow!("The command backend requires backend.command.status"));
            }
            if self.backend.command.on.is_none() {
                return Err(anyhow!("The command backend requires backend.command.on"));
            }
        }

        match self.backend.ipmi.off_action.as_str() {
            "soft" | "off" => {}
            other => {
                return Err(anyhow!(
                    "Invalid backend.ipmi.off_action '{}'. Valid actions: soft, off",
                    other
                ))
            }
        }

        // Fail fast on a schedule that could never be generated
        crate::monitor::schedule::generate(&self.monitor.schedule_params())
            .context("Invalid monitor settings")?;

        Ok(())
    }
}
