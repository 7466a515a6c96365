//! Power state data types: probe results, snapshots and the derived state.

use std::fmt;

use serde::Serialize;

/// Outcome of one probe call. The boolean is only meaningful when the probe succeeded.
pub type ProbeResult = anyhow::Result<bool>;

/// Both probe results gathered in a single evaluation round.
#[derive(Debug)]
pub struct StateSnapshot {
    pub primary: ProbeResult,
    pub secondary: ProbeResult,
}

impl StateSnapshot {
    pub fn new(primary: ProbeResult, secondary: ProbeResult) -> Self {
        Self { primary, secondary }
    }

    /// Either signal proves the machine is on, but only when neither probe failed.
    pub fn is_on(&self) -> Option<bool> {
        match (&self.primary, &self.secondary) {
            (Ok(primary), Ok(secondary)) => Some(*primary || *secondary),
            _ => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.primary.is_err() || self.secondary.is_err()
    }

    /// Probe errors labelled by signal, in probe order.
    pub fn errors(&self) -> impl Iterator<Item = (Signal, &anyhow::Error)> {
        [
            (Signal::Primary, self.primary.as_ref().err()),
            (Signal::Secondary, self.secondary.as_ref().err()),
        ]
        .into_iter()
        .filter_map(|(signal, err)| err.map(|e| (signal, e)))
    }

    pub fn power_state(&self) -> PowerState {
        match self.is_on() {
            Some(true) => PowerState::On,
            Some(false) => PowerState::Off,
            None => PowerState::Unknown,
        }
    }

    /// JSON view used by the `state` command: failed probes become `null`.
    pub fn report(&self) -> StateReport {
        StateReport {
            power: self.primary.as_ref().ok().copied(),
            alive: self.secondary.as_ref().ok().copied(),
            on: self.is_on(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Primary,
    Secondary,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Primary => write!(f, "POWER"),
            Signal::Secondary => write!(f, "LIVENESS"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateReport {
    pub power: Option<bool>,
    pub alive: Option<bool>,
    pub on: Option<bool>,
}
