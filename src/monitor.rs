//! Adaptive startup monitoring: polling schedule, session loop and notifications.

pub mod schedule;
pub mod session;
pub mod notify;
pub mod messages;

pub use messages::Messages;
pub use notify::{CommandNotifier, LogNotifier, Notifier, StdoutNotifier};
pub use schedule::{generate, Schedule, ScheduleError, ScheduleParams};
pub use session::{MonitorOutcome, SessionState, StartupMonitor};
