//! Integration tests for the startup monitor.
//!
//! Every test runs on tokio's paused clock, so schedule waits complete
//! instantly while elapsed times stay exact.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{five_step_schedule, test_messages, RecordingNotifier, ScriptedBackend};
use power_agent::monitor::schedule::{generate, ScheduleParams};
use power_agent::monitor::{MonitorOutcome, StartupMonitor};

fn monitor(backend: &Arc<ScriptedBackend>, notifier: &Arc<RecordingNotifier>) -> StartupMonitor {
    StartupMonitor::new(backend.clone(), five_step_schedule(), notifier.clone(), test_messages())
}

// ---------------------------------------------------------------------------
// Test: success
// ---------------------------------------------------------------------------

/// The machine comes up on the third check: the session stops there, reports
/// the time of the first three steps and notifies exactly once.
#[tokio::test(start_paused = true)]
async fn succeeds_on_third_round() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        (Ok(false), Ok(false)),
        (Ok(false), Ok(false)),
        (Ok(true), Ok(false)),
    ]));
    let notifier = Arc::new(RecordingNotifier::default());

    let outcome = monitor(&backend, &notifier).run().await;

    match outcome {
        MonitorOutcome::Succeeded { elapsed, rounds } => {
            assert_eq!(rounds, 3);
            assert!(elapsed >= Duration::from_secs(6), "elapsed {:?}", elapsed);
            assert!(elapsed < Duration::from_millis(6_050), "elapsed {:?}", elapsed);
        }
        other => panic!("expected success, got {:?}", other),
    }
    assert_eq!(backend.rounds(), 3);
    assert_eq!(notifier.delivered(), vec!["alice: up after 6s".to_string()]);
}

/// Liveness alone is enough evidence that the machine is on.
#[tokio::test(start_paused = true)]
async fn secondary_signal_alone_counts_as_on() {
    let backend = Arc::new(ScriptedBackend::new(vec![(Ok(false), Ok(true))]));
    let notifier = Arc::new(RecordingNotifier::default());

    let outcome = monitor(&backend, &notifier).run().await;

    assert!(matches!(outcome, MonitorOutcome::Succeeded { rounds: 1, .. }));
    assert_eq!(notifier.delivered().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: timeout
// ---------------------------------------------------------------------------

/// The machine never comes up: every step is used, then one timeout message.
#[tokio::test(start_paused = true)]
async fn times_out_after_exhausting_schedule() {
    let backend = Arc::new(ScriptedBackend::constant(Ok(false)));
    let notifier = Arc::new(RecordingNotifier::default());

    let start = tokio::time::Instant::now();
    let outcome = monitor(&backend, &notifier).run().await;

    assert_eq!(
        outcome,
        MonitorOutcome::TimedOut {
            rounds: 5,
            degraded_rounds: 0
        }
    );
    assert!(start.elapsed() >= Duration::from_secs(15));
    assert_eq!(backend.rounds(), 5);
    assert_eq!(notifier.delivered(), vec!["alice: still down after 15s".to_string()]);
}

/// Rounds where a probe keeps failing are counted but never end the session early.
#[tokio::test(start_paused = true)]
async fn persistent_probe_errors_run_to_timeout() {
    let backend = Arc::new(ScriptedBackend::constant(Err("no route to host")));
    let notifier = Arc::new(RecordingNotifier::default());

    let outcome = monitor(&backend, &notifier).run().await;

    assert_eq!(
        outcome,
        MonitorOutcome::TimedOut {
            rounds: 5,
            degraded_rounds: 5
        }
    );
    assert_eq!(notifier.delivered().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: resilience
// ---------------------------------------------------------------------------

/// A transient error on the secondary probe is skipped; the next clean
/// round that reports on ends the session.
#[tokio::test(start_paused = true)]
async fn transient_error_does_not_abort() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        (Ok(true), Err("ping timed out")),
        (Ok(true), Ok(true)),
    ]));
    let notifier = Arc::new(RecordingNotifier::default());

    let outcome = monitor(&backend, &notifier).run().await;

    match outcome {
        MonitorOutcome::Succeeded { elapsed, rounds } => {
            assert_eq!(rounds, 2);
            assert!(elapsed >= Duration::from_secs(3));
        }
        other => panic!("expected success, got {:?}", other),
    }
    assert_eq!(notifier.delivered(), vec!["alice: up after 3s".to_string()]);
}

/// A notifier that cannot deliver does not change the outcome.
#[tokio::test(start_paused = true)]
async fn notifier_failure_keeps_outcome() {
    let backend = Arc::new(ScriptedBackend::new(vec![(Ok(true), Ok(true))]));
    let notifier = Arc::new(RecordingNotifier::failing());

    let outcome = monitor(&backend, &notifier).run().await;

    assert!(outcome.is_success());
    assert_eq!(notifier.delivered().len(), 1, "delivery must not be retried");
}

// ---------------------------------------------------------------------------
// Test: task handles and concurrent sessions
// ---------------------------------------------------------------------------

/// Spawned sessions are independent: each keeps its own schedule and backend.
#[tokio::test(start_paused = true)]
async fn concurrent_sessions_are_independent() {
    let fast = Arc::new(ScriptedBackend::new(vec![(Ok(true), Ok(true))]));
    let slow = Arc::new(ScriptedBackend::constant(Ok(false)));
    let fast_notifier = Arc::new(RecordingNotifier::default());
    let slow_notifier = Arc::new(RecordingNotifier::default());

    let fast_handle = monitor(&fast, &fast_notifier).spawn();
    let slow_handle = monitor(&slow, &slow_notifier).spawn();

    let fast_outcome = fast_handle.await.unwrap();
    let slow_outcome = slow_handle.await.unwrap();

    assert!(matches!(fast_outcome, MonitorOutcome::Succeeded { rounds: 1, .. }));
    assert!(matches!(slow_outcome, MonitorOutcome::TimedOut { rounds: 5, .. }));
    assert_eq!(fast.rounds(), 1);
    assert_eq!(slow.rounds(), 5);
    assert_eq!(fast_notifier.delivered().len(), 1);
    assert_eq!(slow_notifier.delivered().len(), 1);
}

/// The default startup schedule drives a full session to timeout in three minutes.
#[tokio::test(start_paused = true)]
async fn default_schedule_spans_three_minutes() {
    let schedule = generate(&ScheduleParams::default()).unwrap();
    let steps = schedule.len();
    let backend = Arc::new(ScriptedBackend::constant(Ok(false)));
    let notifier = Arc::new(RecordingNotifier::default());

    let start = tokio::time::Instant::now();
    let outcome = StartupMonitor::new(backend.clone(), schedule, notifier.clone(), test_messages())
        .run()
        .await;

    assert!(matches!(outcome, MonitorOutcome::TimedOut { rounds, .. } if rounds == steps));
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(180));
    assert!(elapsed < Duration::from_secs(181));
    assert_eq!(notifier.delivered(), vec!["alice: still down after 3m 0s".to_string()]);
}
