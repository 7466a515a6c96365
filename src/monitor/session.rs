//! Startup monitor: waits out each schedule step, evaluates the power state,
//! and reports success or timeout through a notifier exactly once.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::messages::Messages;
use super::notify::Notifier;
use super::schedule::Schedule;
use crate::power::state::evaluate;
use crate::power::PowerBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Waiting,
    Checking,
    Succeeded,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorOutcome {
    Succeeded { elapsed: Duration, rounds: usize },
    TimedOut { rounds: usize, degraded_rounds: usize },
}

impl MonitorOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MonitorOutcome::Succeeded { .. })
    }
}

pub struct StartupMonitor {
    id: Uuid,
    backend: Arc<dyn PowerBackend>,
    schedule: Schedule,
    notifier: Arc<dyn Notifier>,
    messages: Messages,
    state: SessionState,
}

impl StartupMonitor {
    pub fn new(
        backend: Arc<dyn PowerBackend>,
        schedule: Schedule,
        notifier: Arc<dyn Notifier>,
        messages: Messages,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            backend,
            schedule,
            notifier,
            messages,
            state: SessionState::Waiting,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run the session on its own task. Dropping the handle does not stop it.
    pub fn spawn(self) -> JoinHandle<MonitorOutcome> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) -> MonitorOutcome {
        let timeout = self.schedule.total();
        let steps = std::mem::replace(&mut self.schedule, Schedule::from(Vec::new()));
        let start = Instant::now();
        let mut rounds = 0;
        let mut degraded_rounds = 0;

        info!(
            "[{}] Monitoring {} startup: {} checks over {:?}",
            self.id,
            self.backend.name(),
            steps.len(),
            timeout
        );

        for step in steps.into_steps() {
            debug!(
                "[{}] Waiting {:.1}s before next check (elapsed {:.1}s)",
                self.id,
                step.as_secs_f64(),
                start.elapsed().as_secs_f64()
            );
            tokio::time::sleep(step).await;

            self.transition(SessionState::Checking);
            let snapshot = evaluate(self.backend.as_ref()).await;
            rounds += 1;

            match snapshot.is_on() {
                None => {
                    degraded_rounds += 1;
                    for (signal, err) in snapshot.errors() {
                        warn!("[{}] Failed to retrieve {} state during monitoring: {:#}", self.id, signal, err);
                    }
                    self.transition(SessionState::Waiting);
                }
                Some(true) => {
                    self.transition(SessionState::Succeeded);
                    let elapsed = start.elapsed();
                    info!(
                        "[{}] Server successfully started after {:.0}s ({} checks)",
                        self.id,
                        elapsed.as_secs_f64(),
                        rounds
                    );
                    self.deliver(&self.messages.online(elapsed)).await;
                    return MonitorOutcome::Succeeded { elapsed, rounds };
                }
                Some(false) => {
                    self.transition(SessionState::Waiting);
                }
            }
        }

        self.transition(SessionState::TimedOut);
        warn!(
            "[{}] Server did not start within {:?} ({} checks, {} degraded)",
            self.id, timeout, rounds, degraded_rounds
        );
        self.deliver(&self.messages.timed_out(timeout)).await;

        MonitorOutcome::TimedOut { rounds, degraded_rounds }
    }

    fn transition(&mut self, next: SessionState) {
        debug!("[{}] {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
    }

    /// Delivery failures are logged and never change the outcome.
    async fn deliver(&self, message: &str) {
        if let Err(e) = self.notifier.notify(message).await {
            error!("[{}] Failed to deliver notification: {:#}", self.id, e);
        }
    }
}
