//! Scripted backend and recording notifier shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use power_agent::monitor::{Messages, Notifier, Schedule};
use power_agent::power::types::ProbeResult;
use power_agent::power::PowerBackend;

/// What a probe answers in one round: a reading or an error message.
pub type Reading = std::result::Result<bool, &'static str>;

/// Replays one scripted reading per probe call; once the script runs out
/// both probes keep answering `fallback`.
pub struct ScriptedBackend {
    primary: Mutex<VecDeque<Reading>>,
    secondary: Mutex<VecDeque<Reading>>,
    fallback: Reading,
    fail_actuation: bool,
    pub primary_calls: AtomicUsize,
    pub secondary_calls: AtomicUsize,
    pub power_on_calls: AtomicUsize,
    pub power_off_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(rounds: Vec<(Reading, Reading)>) -> Self {
        let (primary, secondary): (VecDeque<_>, VecDeque<_>) = rounds.into_iter().unzip();
        Self {
            primary: Mutex::new(primary),
            secondary: Mutex::new(secondary),
            fallback: Ok(false),
            fail_actuation: false,
            primary_calls: AtomicUsize::new(0),
            secondary_calls: AtomicUsize::new(0),
            power_on_calls: AtomicUsize::new(0),
            power_off_calls: AtomicUsize::new(0),
        }
    }

    /// Always reports the same reading on both probes.
    pub fn constant(reading: Reading) -> Self {
        let mut backend = Self::new(Vec::new());
        backend.fallback = reading;
        backend
    }

    pub fn failing_actuation(mut self) -> Self {
        self.fail_actuation = true;
        self
    }

    pub fn rounds(&self) -> usize {
        self.primary_calls.load(Ordering::SeqCst)
    }

    fn next(&self, queue: &Mutex<VecDeque<Reading>>) -> ProbeResult {
        let reading = queue.lock().unwrap().pop_front().unwrap_or(self.fallback);
        reading.map_err(|e| anyhow!(e))
    }
}

#[async_trait]
impl PowerBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn probe_primary(&self) -> ProbeResult {
        self.primary_calls.fetch_add(1, Ordering::SeqCst);
        self.next(&self.primary)
    }

    async fn probe_secondary(&self) -> ProbeResult {
        self.secondary_calls.fetch_add(1, Ordering::SeqCst);
        self.next(&self.secondary)
    }

    async fn power_on(&self) -> Result<()> {
        self.power_on_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_actuation {
            return Err(anyhow!("BMC rejected the request"));
        }
        Ok(())
    }

    async fn power_off(&self) -> Result<()> {
        self.power_off_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_actuation {
            return Err(anyhow!("BMC rejected the request"));
        }
        Ok(())
    }
}

/// Records every delivered message, optionally failing each delivery.
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn delivered(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        self.messages.lock().unwrap().push(message.to_string());
        if self.fail {
            return Err(anyhow!("cannot create DM channel"));
        }
        Ok(())
    }
}

pub fn test_messages() -> Messages {
    Messages {
        name: "alice".to_string(),
        success: "{{NAME}}: up after {{ELAPSED}}".to_string(),
        timeout: "{{NAME}}: still down after {{TIMEOUT}}".to_string(),
    }
}

/// Five steps of 1s, 2s, 3s, 4s and 5s.
pub fn five_step_schedule() -> Schedule {
    Schedule::from((1..=5).map(Duration::from_secs).collect::<Vec<_>>())
}
