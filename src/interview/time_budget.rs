use chrono::{DateTime, Utc};

/// Elapsed fraction at which the interview should start concluding
pub const CONCLUDE_AT_FRACTION: f64 = 0.9;

/// Remaining minutes at or below which the interview should start concluding
pub const CONCLUDE_REMAINING_MINUTES: f64 = 3.0;

/// Remaining fraction required before a dynamic question may be generated
pub const DYNAMIC_MIN_REMAINING_FRACTION: f64 = 0.25;

/// Remaining minutes required before a dynamic question may be generated
pub const DYNAMIC_MIN_REMAINING_MINUTES: f64 = 2.0;

/// Snapshot of the time budget at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBudget {
    pub elapsed_minutes: f64,
    pub remaining_minutes: f64,
    pub elapsed_fraction: f64,
}

impl TimeBudget {
    /// Evaluate the budget for a session that started at `started_at`.
    ///
    /// A clock that runs behind `started_at` counts as zero elapsed time.
    pub fn evaluate(started_at: DateTime<Utc>, now: DateTime<Utc>, duration_minutes: f64) -> Self {
        let elapsed_ms = now.signed_duration_since(started_at).num_milliseconds().max(0);
        Self::from_elapsed(elapsed_ms as f64 / 60_000.0, duration_minutes)
    }

    pub fn from_elapsed(elapsed_minutes: f64, duration_minutes: f64) -> Self {
        let elapsed_fraction = if duration_minutes > 0.0 {
            elapsed_minutes / duration_minutes
        } else {
            f64::INFINITY
        };

        Self {
            elapsed_minutes,
            remaining_minutes: duration_minutes - elapsed_minutes,
            elapsed_fraction,
        }
    }

    pub fn remaining_fraction(&self) -> f64 {
        1.0 - self.elapsed_fraction
    }

    pub fn conclusion_due(&self) -> bool {
        self.elapsed_fraction >= CONCLUDE_AT_FRACTION
            || self.remaining_minutes <= CONCLUDE_REMAINING_MINUTES
    }

    /// Enough time left to ask a generated follow-up question
    pub fn allows_dynamic_question(&self) -> bool {
        self.remaining_fraction() > DYNAMIC_MIN_REMAINING_FRACTION
            && self.remaining_minutes > DYNAMIC_MIN_REMAINING_MINUTES
    }
}

/// Whether the interview should begin concluding
pub fn conclusion_due(
    started_at: DateTime<Utc>,
    now: DateTime<Utc>,
    duration_minutes: f64,
) -> bool {
    TimeBudget::evaluate(started_at, now, duration_minutes).conclusion_due()
}
