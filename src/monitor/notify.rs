//! Notifier trait and the built-in delivery channels.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::system::executor;

/// Delivers the final message of a monitoring session.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<()>;
}

/// Writes the message to the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        info!("{}", message);
        Ok(())
    }
}

/// Prints the message on stdout.
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        println!("{}", message);
        Ok(())
    }
}

/// Runs a shell command with the message exported as `POWER_MESSAGE`,
/// e.g. `notify-send Power "$POWER_MESSAGE"` or a chat webhook script.
pub struct CommandNotifier {
    script: String,
    timeout: Duration,
}

impl CommandNotifier {
    pub const MESSAGE_ENV: &'static str = "POWER_MESSAGE";

    pub fn new(script: impl Into<String>, timeout: Duration) -> Self {
        Self {
            script: script.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Notifier for CommandNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        let mut cmd = executor::build_shell_command(&self.script);
        cmd.env(Self::MESSAGE_ENV, message);

        debug!("Delivering notification through: {}", self.script);
        executor::run_checked(cmd, self.timeout)
            .await
            .context("Notification command failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn command_notifier_passes_the_message() {
        let path = std::env::temp_dir().join(format!("power-notify-{}.txt", uuid::Uuid::new_v4()));
        let script = format!("printf '%s' \"$POWER_MESSAGE\" > {}", path.display());

        let notifier = CommandNotifier::new(script, Duration::from_secs(5));
        notifier.notify("server is up").await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(written, "server is up");
    }

    #[tokio::test]
    async fn command_notifier_reports_failure() {
        let notifier = CommandNotifier::new("exit 1", Duration::from_secs(5));
        assert!(notifier.notify("server is up").await.is_err());
    }
}
