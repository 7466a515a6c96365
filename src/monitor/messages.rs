//! Notification message templates.
//! Substitutes {{NAME}}, {{ELAPSED}} and {{TIMEOUT}} in user-configurable templates.

use std::time::Duration;

pub const DEFAULT_SUCCESS_TEMPLATE: &str = "✅ {{NAME}}, the server is now online! (took {{ELAPSED}})";
pub const DEFAULT_TIMEOUT_TEMPLATE: &str =
    "😅 {{NAME}}, the server is taking longer than usual. Please check it manually";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    /// Who the messages are addressed to
    pub name: String,
    pub success: String,
    pub timeout: String,
}

impl Messages {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: DEFAULT_SUCCESS_TEMPLATE.to_string(),
            timeout: DEFAULT_TIMEOUT_TEMPLATE.to_string(),
        }
    }

    pub fn online(&self, elapsed: Duration) -> String {
        interpolate(&self.success, &self.name, elapsed, Duration::ZERO)
    }

    pub fn timed_out(&self, timeout: Duration) -> String {
        interpolate(&self.timeout, &self.name, Duration::ZERO, timeout)
    }
}

pub fn interpolate(template: &str, name: &str, elapsed: Duration, timeout: Duration) -> String {
    template
        .replace("{{NAME}}", name)
        .replace("{{ELAPSED}}", &format_duration(elapsed))
        .replace("{{TIMEOUT}}", &format_duration(timeout))
}

/// Whole seconds, e.g. "45s", "1m 12s", "1h 0m 5s".
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs_f64().round() as u64;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
