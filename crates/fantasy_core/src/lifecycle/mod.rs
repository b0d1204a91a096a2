//! # Match lifecycle
//!
//! Decides, from a match's start time and the caller's `now`, whether a
//! match is live and how long to wait before looking at it again.
//!
//! ```text
//! NotStarted ──(now ≥ start)──▶ Active ──(elapsed ≥ 5h)──▶ Completed
//!                               │ elapsed < 4h: every 15 min
//!                               │ 4h ≤ elapsed < 5h: every 30 min
//! ```
//!
//! Intervals are capped at the next tier boundary so a check never skips
//! past it. Status only ever moves forward.

mod descriptor;

pub use descriptor::{MatchBoard, MatchDescriptor, MatchUpdate, TeamSlot};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LifecycleError;

/// Lifecycle state, ordered so that a transition is legal only when it increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    #[serde(rename = "pending", alias = "not_started")]
    NotStarted,
    #[serde(rename = "in_progress", alias = "active")]
    Active,
    #[serde(rename = "completed")]
    Completed,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchStatus::NotStarted => "pending",
            MatchStatus::Active => "in_progress",
            MatchStatus::Completed => "completed",
        })
    }
}

/// When a match should next be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextCheck {
    After(Duration),
    /// Terminal: the match is never checked again.
    Never,
}

impl NextCheck {
    pub fn as_seconds(&self) -> Option<i64> {
        match self {
            NextCheck::After(wait) => Some(wait.num_seconds()),
            NextCheck::Never => None,
        }
    }

    /// Wall-clock time of the next check counted from `now`.
    pub fn due_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            NextCheck::After(wait) => now.checked_add_signed(*wait),
            NextCheck::Never => None,
        }
    }
}

/// Outcome of one [`evaluate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub previous: MatchStatus,
    pub status: MatchStatus,
    pub next_check: NextCheck,
}

impl Evaluation {
    pub fn transitioned(&self) -> bool {
        self.status != self.previous
    }

    /// Scores should be recomputed while the match is live, plus once more on
    /// the transition that completes it.
    pub fn needs_recompute(&self) -> bool {
        match self.status {
            MatchStatus::Active => true,
            MatchStatus::Completed => self.previous == MatchStatus::Active,
            MatchStatus::NotStarted => false,
        }
    }
}

/// Polling cadence, in minutes.
///
/// Deserialising checks the schedule; a literal built in code should go
/// through [`PollingSchedule::new`] or [`PollingSchedule::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleDocument")]
pub struct PollingSchedule {
    /// Interval while the match is in its main window.
    pub live_interval_minutes: u32,
    /// Length of the main window from the start time.
    pub live_window_minutes: u32,
    /// Interval after the main window, until completion.
    pub late_interval_minutes: u32,
    /// Elapsed time at which the match counts as completed.
    pub completion_minutes: u32,
}

impl Default for PollingSchedule {
    fn default() -> Self {
        Self {
            live_interval_minutes: 15,
            live_window_minutes: 4 * 60,
            late_interval_minutes: 30,
            completion_minutes: 5 * 60,
        }
    }
}

/// Unchecked form read from configuration, missing fields taking the defaults.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ScheduleDocument {
    live_interval_minutes: u32,
    live_window_minutes: u32,
    late_interval_minutes: u32,
    completion_minutes: u32,
}

impl Default for ScheduleDocument {
    fn default() -> Self {
        let d = PollingSchedule::default();
        Self {
            live_interval_minutes: d.live_interval_minutes,
            live_window_minutes: d.live_window_minutes,
            late_interval_minutes: d.late_interval_minutes,
            completion_minutes: d.completion_minutes,
        }
    }
}

impl TryFrom<ScheduleDocument> for PollingSchedule {
    type Error = LifecycleError;

    fn try_from(doc: ScheduleDocument) -> Result<Self, Self::Error> {
        PollingSchedule::new(
            doc.live_interval_minutes,
            doc.live_window_minutes,
            doc.late_interval_minutes,
            doc.completion_minutes,
        )
    }
}

impl PollingSchedule {
    /// Checked constructor.
    pub fn new(
        live_interval_minutes: u32,
        live_window_minutes: u32,
        late_interval_minutes: u32,
        completion_minutes: u32,
    ) -> Result<Self, LifecycleError> {
        let schedule = Self {
            live_interval_minutes,
            live_window_minutes,
            late_interval_minutes,
            completion_minutes,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.live_interval_minutes == 0 || self.late_interval_minutes == 0 {
            return Err(LifecycleError::InvalidSchedule("polling intervals must be positive".to_string()));
        }
        if self.live_window_minutes == 0 || self.live_window_minutes > self.completion_minutes {
            return Err(LifecycleError::InvalidSchedule(format!(
                "live window of {} min must be positive and end by completion at {} min",
                self.live_window_minutes, self.completion_minutes
            )));
        }
        Ok(())
    }

    /// Next status and wait for a match in `status` that starts at `start`.
    ///
    /// The schedule must pass [`PollingSchedule::validate`]; with a zero
    /// interval the returned wait is zero.
    pub fn evaluate(&self, status: MatchStatus, start: DateTime<Utc>, now: DateTime<Utc>) -> Evaluation {
        let (next, next_check) = match status {
            MatchStatus::Completed => (MatchStatus::Completed, NextCheck::Never),
            MatchStatus::NotStarted if now < start => (MatchStatus::NotStarted, NextCheck::After(start - now)),
            // Just went live: poll from the first interval regardless of how late we noticed.
            MatchStatus::NotStarted => self.live(Duration::zero()),
            // A clock running behind the start time cannot move the match backwards.
            MatchStatus::Active => self.live((now - start).max(Duration::zero())),
        };
        Evaluation { previous: status, status: next, next_check }
    }

    fn live(&self, elapsed: Duration) -> (MatchStatus, NextCheck) {
        let window = minutes(self.live_window_minutes);
        let completion = minutes(self.completion_minutes);
        if elapsed < window {
            let wait = minutes(self.live_interval_minutes).min(window - elapsed);
            (MatchStatus::Active, NextCheck::After(wait))
        } else if elapsed < completion {
            let wait = minutes(self.late_interval_minutes).min(completion - elapsed);
            (MatchStatus::Active, NextCheck::After(wait))
        } else {
            (MatchStatus::Completed, NextCheck::Never)
        }
    }
}

fn minutes(value: u32) -> Duration {
    Duration::minutes(i64::from(value))
}

/// [`PollingSchedule::evaluate`] under the default 15 min / 4 h / 30 min / 5 h cadence.
pub fn evaluate(status: MatchStatus, start: DateTime<Utc>, now: DateTime<Utc>) -> Evaluation {
    PollingSchedule::default().evaluate(status, start, now)
}
