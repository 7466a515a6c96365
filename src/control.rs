//! Power triggers shared by every front-end: state query, power-on with
//! startup monitoring, power-off.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::monitor::{generate, Messages, MonitorOutcome, Notifier, ScheduleParams, StartupMonitor};
use crate::power::state::evaluate;
use crate::power::types::PowerState;
use crate::power::PowerBackend;

pub enum PowerOnOutcome {
    /// The machine already reports on; nothing was actuated.
    AlreadyOn,
    /// Power-on was triggered; the handle resolves when monitoring ends.
    Started(JoinHandle<MonitorOutcome>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerOffOutcome {
    AlreadyOff,
    ShuttingDown,
}

/// One-shot state query. Any probe failure fails the whole query.
pub async fn query_state(backend: &dyn PowerBackend) -> Result<PowerState> {
    let snapshot = evaluate(backend).await;

    let mut failed = false;
    for (signal, err) in snapshot.errors() {
        error!("Failed to retrieve {} state: {:#}", signal, err);
        failed = true;
    }
    if failed {
        return Err(anyhow!("Unable to determine the {} power state", backend.name()));
    }

    Ok(snapshot.power_state())
}

pub async fn power_on(
    backend: Arc<dyn PowerBackend>,
    params: &ScheduleParams,
    notifier: Arc<dyn Notifier>,
    messages: Messages,
) -> Result<PowerOnOutcome> {
    let schedule = generate(params).context("Failed to generate intervals for server monitoring")?;

    if query_state(backend.as_ref()).await? == PowerState::On {
        info!("The server is already switched on");
        return Ok(PowerOnOutcome::AlreadyOn);
    }

    backend
        .power_on()
        .await
        .context("A problem occurred when switching on the server")?;
    info!("Server switched on");

    let monitor = StartupMonitor::new(backend, schedule, notifier, messages);
    Ok(PowerOnOutcome::Started(monitor.spawn()))
}

pub async fn power_off(backend: &dyn PowerBackend) -> Result<PowerOffOutcome> {
    if query_state(backend).await? == PowerState::Off {
        info!("The server is already switched off");
        return Ok(PowerOffOutcome::AlreadyOff);
    }

    backend
        .power_off()
        .await
        .context("A problem occurred when switching off the server")?;
    info!("Server switched off");

    Ok(PowerOffOutcome::ShuttingDown)
}
