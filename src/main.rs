//! Power agent entry point: CLI dispatch, backend selection, async runtime.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use power_agent::app::cli::{Args, Command, ScheduleArgs};
use power_agent::app::logging::init_tracing;
use power_agent::config::{load_config, AppConfig};
use power_agent::control::{self, PowerOffOutcome, PowerOnOutcome};
use power_agent::monitor::schedule::{self, ScheduleParams};
use power_agent::monitor::{CommandNotifier, LogNotifier, Messages, MonitorOutcome, Notifier, StdoutNotifier};
use power_agent::power::{state::evaluate, BackendRegistry, PowerBackend};

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Priority: 1. --log-level flag, 2. LOG_LEVEL env, 3. config file, 4. default (info)
    let early_level = args
        .log_level
        .clone()
        .or_else(|| std::env::var("LOG_LEVEL").ok());

    let config = match load_config_quietly(&args).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let level = early_level.unwrap_or_else(|| config.agent.log_level.clone());
    init_tracing(&level);

    match run(args, config).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Runs before the subscriber exists, so load messages are not logged.
async fn load_config_quietly(args: &Args) -> Result<AppConfig> {
    let mut config = load_config(&args.config).await?;
    if let Some(kind) = &args.backend {
        config.backend.kind = kind.clone();
    }
    Ok(config)
}

async fn run(args: Args, config: AppConfig) -> Result<i32> {
    match args.command {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(0)
        }
        Command::Schedule(overrides) => {
            show_schedule(&config, &overrides)?;
            Ok(0)
        }
        Command::State => {
            let backend = resolve_backend(&config)?;
            show_state(backend.as_ref()).await
        }
        Command::Up { wait } => {
            let backend = resolve_backend(&config)?;
            power_up(backend, &config, wait).await
        }
        Command::Down => {
            let backend = resolve_backend(&config)?;
            power_down(backend.as_ref()).await
        }
    }
}

fn resolve_backend(config: &AppConfig) -> Result<Arc<dyn PowerBackend>> {
    config.validate()?;
    let registry = BackendRegistry::builtin();
    let backend = registry.resolve(&config.backend.kind, &config.backend)?;
    info!("Power agent v{} ({} backend)", env!("CARGO_PKG_VERSION"), backend.name());
    Ok(backend)
}

async fn show_state(backend: &dyn PowerBackend) -> Result<i32> {
    let snapshot = evaluate(backend).await;

    for (signal, err) in snapshot.errors() {
        eprintln!("Failed to retrieve {} state: {:#}", signal, err);
    }

    println!("{}", serde_json::to_string(&snapshot.report())?);
    Ok(if snapshot.is_degraded() { 1 } else { 0 })
}

async fn power_up(backend: Arc<dyn PowerBackend>, config: &AppConfig, wait: bool) -> Result<i32> {
    let notifier: Arc<dyn Notifier> = if wait {
        Arc::new(StdoutNotifier)
    } else if let Some(script) = &config.notify.command {
        Arc::new(CommandNotifier::new(script.clone(), NOTIFY_TIMEOUT))
    } else {
        Arc::new(LogNotifier)
    };

    let messages = Messages {
        name: config.agent.name.clone(),
        success: config.notify.success_template.clone(),
        timeout: config.notify.timeout_template.clone(),
    };

    let params = config.monitor.schedule_params();
    match control::power_on(backend, &params, notifier, messages).await? {
        PowerOnOutcome::AlreadyOn => {
            println!("✅ The server is already running!");
            Ok(0)
        }
        PowerOnOutcome::Started(handle) => {
            println!("✨ The server is waking up! It'll be ready soon");
            // The session owns the notification, so the process stays until it ends.
            match handle.await? {
                MonitorOutcome::Succeeded { .. } => Ok(0),
                MonitorOutcome::TimedOut { .. } => Ok(1),
            }
        }
    }
}

async fn power_down(backend: &dyn PowerBackend) -> Result<i32> {
    match control::power_off(backend).await? {
        PowerOffOutcome::AlreadyOff => println!("✅ The server is already stopped!"),
        PowerOffOutcome::ShuttingDown => println!("🛌 The server is shutting down!"),
    }
    Ok(0)
}

fn show_schedule(config: &AppConfig, overrides: &ScheduleArgs) -> Result<()> {
    let mut monitor = config.monitor.clone();
    if let Some(v) = overrides.timeout {
        monitor.timeout_secs = v;
    }
    if let Some(v) = overrides.min {
        monitor.min_interval_secs = v;
    }
    if let Some(v) = overrides.max {
        monitor.max_interval_secs = v;
    }
    if let Some(v) = overrides.curve_shift {
        monitor.curve_shift = v;
    }
    if let Some(v) = overrides.factor {
        monitor.factor = v;
    }

    let params: ScheduleParams = monitor.schedule_params();
    let steps = schedule::generate(&params)?;
    print!("{}", schedule::render_table(&steps, params.max_interval));
    Ok(())
}
