//! Daily-review streak tracking.
//!
//! A streak counts consecutive calendar days with a completed daily review.
//! The next value depends only on the date of the most recent prior record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::review::DailyReviewRecord;

/// Compute the streak value after a review submitted on `today`.
///
/// - No prior record: the streak starts at 1.
/// - Last record exactly one calendar day away: `current_streak + 1`.
/// - Anything else, including a same-day re-entry: back to 1.
///
/// One-review-per-day is not enforced here; callers check
/// [`crate::review::has_reviewed_on`] first.
pub fn next_streak(prior: &[DailyReviewRecord], current_streak: u32, today: NaiveDate) -> u32 {
    match prior.last() {
        None => 1,
        Some(last) => {
            if day_distance(last.date, today) == 1 {
                current_streak.saturating_add(1)
            } else {
                1
            }
        }
    }
}

/// Absolute whole-day distance between two calendar dates.
pub fn day_distance(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days().abs()
}

/// Outcome of a streak update, kept for logging and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdate {
    pub before: u32,
    pub after: u32,
}

impl StreakUpdate {
    /// A streak of 1 is a fresh start, whatever came before.
    pub fn started(&self) -> bool {
        self.after == 1
    }

    pub fn continued(&self) -> bool {
        !self.started() && self.after > self.before
    }

    /// Short human-readable summary.
    pub fn describe(&self) -> String {
        if self.started() {
            "New streak started".to_string()
        } else if self.continued() {
            format!("Streak extended to {} days", self.after)
        } else {
            format!("Streak at {} days", self.after)
        }
    }
}

/// Streak holder that applies [`next_streak`] to a cached counter.
#[derive(Debug, Clone, Default)]
pub struct StreakTracker {
    current_streak: u32,
}

impl StreakTracker {
    pub fn new(current_streak: u32) -> Self {
        Self { current_streak }
    }

    /// Get current streak value
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    /// Record a review on `today` against the prior history.
    pub fn record(&mut self, prior: &[DailyReviewRecord], today: NaiveDate) -> StreakUpdate {
        let before = self.current_streak;
        self.current_streak = next_streak(prior, before, today);
        StreakUpdate {
            before,
            after: self.current_streak,
        }
    }
}
