//! Configuration structs and defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::monitor::messages::{DEFAULT_SUCCESS_TEMPLATE, DEFAULT_TIMEOUT_TEMPLATE};
use crate::monitor::schedule::ScheduleParams;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentSettings,
    pub backend: BackendSettings,
    pub monitor: MonitorSettings,
    pub notify: NotifySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Name used in notification messages
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Registry name of the backend: "ipmi" or "command"
    pub kind: String,
    /// Host pinged for the liveness signal
    pub hostname: String,
    pub probe_timeout_ms: u64,
    /// Log actuation commands instead of running them
    pub dry_run: bool,
    pub ipmi: IpmiSettings,
    pub command: CommandSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IpmiSettings {
    /// BMC address; local interface when unset
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// `chassis power` action used for power-off: "soft" or "off"
    pub off_action: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSettings {
    /// Exit 0 = on, exit 1 = off
    pub status: Option<String>,
    pub on: Option<String>,
    pub off: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub timeout_secs: f64,
    pub min_interval_secs: f64,
    pub max_interval_secs: f64,
    pub curve_shift: f64,
    pub factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    pub success_template: String,
    pub timeout_template: String,
    /// Shell command run with the message in POWER_MESSAGE
    pub command: Option<String>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        let hostname = hostname::get()
            .unwrap_or_else(|_| std::ffi::OsString::from("unknown"))
            .to_string_lossy()
            .to_string();

        Self {
            name: hostname,
            log_level: "info".to_string(),
        }
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            kind: "ipmi".to_string(),
            hostname: String::new(),
            probe_timeout_ms: 1500,
            dry_run: false,
            ipmi: IpmiSettings::default(),
            command: CommandSettings::default(),
        }
    }
}

impl Default for IpmiSettings {
    fn default() -> Self {
        Self {
            host: None,
            username: None,
            password: None,
            off_action: "soft".to_string(),
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        let params = ScheduleParams::default();
        Self {
            timeout_secs: params.timeout.as_secs_f64(),
            min_interval_secs: params.min_interval.as_secs_f64(),
            max_interval_secs: params.max_interval.as_secs_f64(),
            curve_shift: params.curve_shift,
            factor: params.factor,
        }
    }
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            success_template: DEFAULT_SUCCESS_TEMPLATE.to_string(),
            timeout_template: DEFAULT_TIMEOUT_TEMPLATE.to_string(),
            command: None,
        }
    }
}

impl BackendSettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl MonitorSettings {
    /// Negative or non-finite seconds collapse to zero so the generator rejects them.
    pub fn schedule_params(&self) -> ScheduleParams {
        ScheduleParams {
            timeout: secs(self.timeout_secs),
            min_interval: secs(self.min_interval_secs),
            max_interval: secs(self.max_interval_secs),
            curve_shift: self.curve_shift,
            factor: self.factor,
        }
    }
}

fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}
