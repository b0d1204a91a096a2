//! Match records as kept in the tournament state file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

use super::{Evaluation, MatchStatus, PollingSchedule};
use crate::error::LifecycleError;

/// A team's slot within its gameweek.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSlot {
    pub gameweek_match: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDescriptor {
    pub match_number: u32,
    /// RFC 3339, e.g. `2025-03-22T14:00:00Z`.
    pub start_time: String,
    pub status: MatchStatus,
    /// Scorecard source, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub gameweek: u32,
    #[serde(default)]
    pub teams: BTreeMap<String, TeamSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

/// Evaluation of one match at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchUpdate {
    pub match_number: u32,
    pub evaluated_at: DateTime<Utc>,
    pub evaluation: Evaluation,
}

impl MatchDescriptor {
    pub fn start(&self) -> Result<DateTime<Utc>, LifecycleError> {
        DateTime::parse_from_rfc3339(self.start_time.trim())
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| LifecycleError::MalformedTimestamp {
                match_number: self.match_number,
                value: self.start_time.clone(),
                reason: e.to_string(),
            })
    }

    pub fn evaluate_at(&self, now: DateTime<Utc>, schedule: &PollingSchedule) -> Result<MatchUpdate, LifecycleError> {
        let start = self.start()?;
        Ok(MatchUpdate {
            match_number: self.match_number,
            evaluated_at: now,
            evaluation: schedule.evaluate(self.status, start, now),
        })
    }

    /// Record an update. Status only moves forward; returns whether it moved.
    pub fn apply(&mut self, update: &MatchUpdate) -> bool {
        if update.evaluation.needs_recompute() {
            self.last_update = Some(update.evaluated_at.to_rfc3339());
        }
        if update.evaluation.status > self.status {
            info!(
                match_number = self.match_number,
                from = %self.status,
                to = %update.evaluation.status,
                "Match status advanced"
            );
            self.status = update.evaluation.status;
            true
        } else {
            false
        }
    }
}

/// All tracked matches, in state-file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchBoard {
    pub matches: Vec<MatchDescriptor>,
}

impl MatchBoard {
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        let board: MatchBoard = serde_json::from_str(json)?;
        board.verify()?;
        Ok(board)
    }

    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Match numbers are unique and every start time parses.
    pub fn verify(&self) -> Result<(), LifecycleError> {
        let mut seen = HashSet::with_capacity(self.matches.len());
        for descriptor in &self.matches {
            if !seen.insert(descriptor.match_number) {
                return Err(LifecycleError::DuplicateMatch { match_number: descriptor.match_number });
            }
            descriptor.start()?;
        }
        Ok(())
    }

    pub fn get(&self, match_number: u32) -> Option<&MatchDescriptor> {
        self.matches.iter().find(|m| m.match_number == match_number)
    }

    pub fn evaluate_all(&self, now: DateTime<Utc>, schedule: &PollingSchedule) -> Result<Vec<MatchUpdate>, LifecycleError> {
        self.matches.iter().map(|m| m.evaluate_at(now, schedule)).collect()
    }

    /// Matches whose scores should be recomputed at `now`.
    pub fn due_matches(&self, now: DateTime<Utc>, schedule: &PollingSchedule) -> Result<Vec<MatchUpdate>, LifecycleError> {
        let due: Vec<MatchUpdate> = self
            .evaluate_all(now, schedule)?
            .into_iter()
            .filter(|u| u.evaluation.needs_recompute())
            .collect();
        debug!(due = due.len(), tracked = self.matches.len(), "Lifecycle pass");
        Ok(due)
    }

    /// Evaluate and apply every match, returning the updates that need a recompute.
    pub fn advance(&mut self, now: DateTime<Utc>, schedule: &PollingSchedule) -> Result<Vec<MatchUpdate>, LifecycleError> {
        let updates = self.evaluate_all(now, schedule)?;
        for (descriptor, update) in self.matches.iter_mut().zip(&updates) {
            descriptor.apply(update);
        }
        Ok(updates.into_iter().filter(|u| u.evaluation.needs_recompute()).collect())
    }

    /// Earliest pending check across the board, if any match is still tracked.
    pub fn next_wake(&self, now: DateTime<Utc>, schedule: &PollingSchedule) -> Result<Option<DateTime<Utc>>, LifecycleError> {
        Ok(self
            .evaluate_all(now, schedule)?
            .iter()
            .filter_map(|u| u.evaluation.next_check.due_at(now))
            .min())
    }
}
