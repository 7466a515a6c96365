//! IPMI power backend driven by `ipmitool chassis power` commands.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::types::{BackendSettings, IpmiSettings};
use crate::power::types::ProbeResult;
use crate::power::PowerBackend;
use crate::system::{executor, parser, ping};

/// Actuation commands may take a while on slow BMCs.
const ACTUATION_TIMEOUT: Duration = Duration::from_secs(30);

pub struct IpmiBackend {
    settings: IpmiSettings,
    hostname: String,
    probe_timeout: Duration,
    dry_run: bool,
}

impl IpmiBackend {
    pub fn new(settings: &BackendSettings) -> Self {
        Self {
            settings: settings.ipmi.clone(),
            hostname: settings.hostname.clone(),
            probe_timeout: settings.probe_timeout(),
            dry_run: settings.dry_run,
        }
    }

    async fn chassis_power(&self, action: &str) -> Result<()> {
        if self.dry_run {
            info!("[DRY RUN] Would execute: ipmitool chassis power {}", action);
            return Ok(());
        }

        let output = executor::run_ipmitool_power(&self.settings, action, ACTUATION_TIMEOUT).await?;
        debug!("ipmitool chassis power {}: {}", action, output.trim());
        Ok(())
    }
}

#[async_trait]
impl PowerBackend for IpmiBackend {
    fn name(&self) -> &str {
        "ipmi"
    }

    async fn probe_primary(&self) -> ProbeResult {
        let output = executor::run_ipmitool_power(&self.settings, "status", self.probe_timeout).await?;
        parser::parse_chassis_power(&output)
    }

    async fn probe_secondary(&self) -> ProbeResult {
        ping::ping(&self.hostname, self.probe_timeout).await
    }

    async fn power_on(&self) -> Result<()> {
        self.chassis_power("on").await
    }

    async fn power_off(&self) -> Result<()> {
        self.chassis_power(&self.settings.off_action).await
    }
}
