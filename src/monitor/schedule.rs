//! Logarithmic polling schedule.
//!
//! Step lengths are interpolated between `max_interval` and `min_interval`
//! along `log2(1 + elapsed / curve_shift)`, normalised by the same curve at
//! the timeout. The final step is truncated so the steps add up to the timeout.

use std::fmt::Write as _;
use std::time::Duration;

use thiserror::Error;

/// Remaining time below this is considered consumed.
const EPSILON_SECS: f64 = 1e-9;

/// Upper bound on the number of generated steps.
pub const MAX_STEPS: usize = 100_000;

/// Width of the bar drawn for a step of `max_interval`.
const MAX_BAR_LEN: f64 = 80.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("timeout must be > 0")]
    ZeroTimeout,

    #[error("min interval must be > 0")]
    ZeroMinInterval,

    #[error("max interval ({max:?}) must be >= min interval ({min:?})")]
    MaxBelowMin { min: Duration, max: Duration },

    #[error("curve shift must be finite and > 0 (got {0})")]
    InvalidCurveShift(f64),

    #[error("schedule needs more than {limit} steps, raise the min interval")]
    TooManySteps { limit: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleParams {
    pub timeout: Duration,
    pub min_interval: Duration,
    pub max_interval: Duration,
    pub curve_shift: f64,
    /// Scales the interpolated step; non-positive or non-finite means 1
    pub factor: f64,
}

impl Default for ScheduleParams {
    /// Server startup monitoring: 3 minutes, polled every 40s down to every 5s.
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(180),
            min_interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(40),
            curve_shift: 1.5,
            factor: 1.5,
        }
    }
}

/// Ordered wait durations, consumed front to back.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    steps: Vec<Duration>,
}

impl Schedule {
    pub fn steps(&self) -> &[Duration] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total(&self) -> Duration {
        self.steps.iter().sum()
    }

    pub fn into_steps(self) -> std::vec::IntoIter<Duration> {
        self.steps.into_iter()
    }
}

impl From<Vec<Duration>> for Schedule {
    fn from(steps: Vec<Duration>) -> Self {
        Self { steps }
    }
}

pub fn generate(params: &ScheduleParams) -> Result<Schedule, ScheduleError> {
    if params.timeout.is_zero() {
        return Err(ScheduleError::ZeroTimeout);
    }
    if params.min_interval.is_zero() {
        return Err(ScheduleError::ZeroMinInterval);
    }
    if params.max_interval < params.min_interval {
        return Err(ScheduleError::MaxBelowMin {
            min: params.min_interval,
            max: params.max_interval,
        });
    }
    if !params.curve_shift.is_finite() || params.curve_shift <= 0.0 {
        return Err(ScheduleError::InvalidCurveShift(params.curve_shift));
    }

    let factor = if params.factor.is_finite() && params.factor > 0.0 {
        params.factor
    } else {
        1.0
    };

    let min = params.min_interval.as_secs_f64();
    let max = params.max_interval.as_secs_f64();
    let total = params.timeout.as_secs_f64();
    let shift = params.curve_shift;

    let den = (1.0 + total / shift).log2();
    if !den.is_finite() || den <= 0.0 {
        return Ok(Schedule::from(vec![params.timeout]));
    }

    let estimated = ((total / min).ceil() as usize).saturating_add(1);
    let mut steps = Vec::with_capacity(estimated.min(MAX_STEPS));
    let mut start = 0.0;
    let mut sum = Duration::ZERO;

    while start + EPSILON_SECS < total {
        if steps.len() == MAX_STEPS {
            return Err(ScheduleError::TooManySteps { limit: MAX_STEPS });
        }

        let ratio = ((1.0 + start / shift).log2() / den).clamp(0.0, 1.0);

        let mut next = ((max - min) * (1.0 - ratio) * factor + min).clamp(min, max);

        let remaining = total - start;
        if next > remaining {
            next = remaining;
        }
        if next < EPSILON_SECS {
            next = remaining.min(min);
            if next < EPSILON_SECS {
                break;
            }
        }

        // Nanosecond rounding must never carry the sum past the timeout.
        let left = params.timeout - sum;
        if left.is_zero() {
            break;
        }
        let step = Duration::from_secs_f64(next).max(Duration::from_nanos(1)).min(left);
        steps.push(step);
        sum += step;
        start += next;
    }

    Ok(Schedule::from(steps))
}

/// Render the schedule as a table with a bar proportional to each step.
pub fn render_table(schedule: &Schedule, max_interval: Duration) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>4} | {:>9}  | {:>11}  | Graphical", "Step", "Interval", "Cumulative");
    let _ = writeln!(out, "{}", "-".repeat(35 + MAX_BAR_LEN as usize));

    let max = max_interval.as_secs_f64();
    let mut cumulative = Duration::ZERO;

    for (i, step) in schedule.steps().iter().enumerate() {
        cumulative += *step;
        let bar_len = if max > 0.0 {
            (step.as_secs_f64() / max * MAX_BAR_LEN).round() as usize
        } else {
            0
        };

        let _ = writeln!(
            out,
            " {:>3} | {:>8.2}s  | {:>10.2}s  | {}",
            i + 1,
            step.as_secs_f64(),
            cumulative.as_secs_f64(),
            ".".repeat(bar_len)
        );
    }

    out
}
