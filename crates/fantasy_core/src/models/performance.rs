//! Raw per-player, per-match performance records.
//!
//! Every facet defaults to all-zero so a player who did not bat, bowl or
//! field still has a complete record. Counts are unsigned; the remaining
//! cross-field invariants are checked by [`RawPerformance::validate`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PlayerId, ScoringError};

/// Wickets available to a bowling side in one innings.
pub const MAX_WICKETS_PER_INNINGS: u32 = 10;

/// Overs bowled, stored as legal deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overs {
    balls: u32,
}

impl Overs {
    pub const BALLS_PER_OVER: u32 = 6;
    pub const ZERO: Overs = Overs { balls: 0 };

    pub fn from_balls(balls: u32) -> Self {
        Self { balls }
    }

    /// `complete` full overs plus `balls` (0..=5) of an unfinished one.
    pub fn new(complete: u32, balls: u32) -> Option<Self> {
        if balls >= Self::BALLS_PER_OVER {
            return None;
        }
        complete.checked_mul(Self::BALLS_PER_OVER)?.checked_add(balls).map(Self::from_balls)
    }

    /// Parse scorecard notation where `3.4` means three overs and four balls.
    pub fn from_notation(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let tenths = (value * 10.0).round();
        if (tenths / 10.0 - value).abs() > 1e-6 || tenths > f64::from(u32::MAX) {
            return None;
        }
        let tenths = tenths as u32;
        Self::new(tenths / 10, tenths % 10)
    }

    pub fn legal_balls(&self) -> u32 {
        self.balls
    }

    pub fn complete_overs(&self) -> u32 {
        self.balls / Self::BALLS_PER_OVER
    }

    /// Overs as a rational quantity (legal balls / 6).
    pub fn as_f64(&self) -> f64 {
        f64::from(self.balls) / f64::from(Self::BALLS_PER_OVER)
    }

    pub fn is_zero(&self) -> bool {
        self.balls == 0
    }
}

impl fmt::Display for Overs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.complete_overs(), self.balls % Self::BALLS_PER_OVER)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BattingFacet {
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    /// Whether the player came out to bat at all.
    pub batted: bool,
    pub dismissed: bool,
}

impl BattingFacet {
    /// Runs per 100 balls; `None` when no ball was faced.
    pub fn strike_rate(&self) -> Option<f64> {
        if self.balls_faced == 0 {
            return None;
        }
        Some(f64::from(self.runs) / f64::from(self.balls_faced) * 100.0)
    }

    pub fn is_duck(&self) -> bool {
        self.batted && self.dismissed && self.runs == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BowlingFacet {
    pub overs: Overs,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub maidens: u32,
    pub dot_balls: u32,
    pub wides: u32,
    pub no_balls: u32,
}

impl BowlingFacet {
    /// Runs conceded per over; `None` when no legal ball was bowled.
    pub fn economy(&self) -> Option<f64> {
        if self.overs.is_zero() {
            return None;
        }
        Some(f64::from(self.runs_conceded) / self.overs.as_f64())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldingFacet {
    pub catches: u32,
    pub stumpings: u32,
    pub run_outs_direct: u32,
    pub run_outs_assisted: u32,
}

/// Innings-level averages used by the differential rules.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InningsContext {
    /// Strike rate of the player's batting innings as a whole.
    pub batting_strike_rate: Option<f64>,
    /// Economy of the player's bowling side as a whole.
    pub bowling_economy: Option<f64>,
}

/// One player's raw statistics for one match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPerformance {
    pub player: PlayerId,
    pub batting: BattingFacet,
    pub bowling: BowlingFacet,
    pub fielding: FieldingFacet,
    pub player_of_the_match: bool,
    pub context: InningsContext,
}

impl RawPerformance {
    /// An all-zero record for `player`.
    pub fn for_player(player: impl Into<PlayerId>) -> Self {
        Self { player: player.into(), ..Default::default() }
    }

    /// Check cross-field invariants. A record that fails is rejected, never clamped.
    pub fn validate(&self) -> Result<(), ScoringError> {
        self.validate_batting()?;
        self.validate_bowling()?;
        self.validate_context()
    }

    fn reject(&self, reason: String) -> Result<(), ScoringError> {
        Err(ScoringError::invalid(&self.player, reason))
    }

    fn validate_batting(&self) -> Result<(), ScoringError> {
        let b = &self.batting;
        if !b.batted && (b.runs > 0 || b.balls_faced > 0 || b.fours > 0 || b.sixes > 0 || b.dismissed) {
            return self.reject("batting figures recorded for a player who did not bat".to_string());
        }
        if b.runs > 0 && b.balls_faced == 0 {
            return self.reject(format!("{} runs scored without facing a ball", b.runs));
        }
        let boundary_balls = u64::from(b.fours) + u64::from(b.sixes);
        if boundary_balls > u64::from(b.balls_faced) {
            return self.reject(format!(
                "{} boundaries exceed {} balls faced",
                boundary_balls, b.balls_faced
            ));
        }
        let boundary_runs = u64::from(b.fours) * 4 + u64::from(b.sixes) * 6;
        if boundary_runs > u64::from(b.runs) {
            return self.reject(format!(
                "boundary runs {} exceed runs scored {}",
                boundary_runs, b.runs
            ));
        }
        Ok(())
    }

    fn validate_bowling(&self) -> Result<(), ScoringError> {
        let w = &self.bowling;
        let balls = w.overs.legal_balls();
        if w.dot_balls > balls {
            return self.reject(format!("{} dot balls exceed {} legal balls ({} overs)", w.dot_balls, balls, w.overs));
        }
        if w.maidens > w.overs.complete_overs() {
            return self.reject(format!("{} maidens exceed {} complete overs", w.maidens, w.overs.complete_overs()));
        }
        if u64::from(w.maidens) * u64::from(Overs::BALLS_PER_OVER) > u64::from(w.dot_balls) {
            return self.reject(format!(
                "{} maidens require at least {} dot balls, found {}",
                w.maidens,
                w.maidens * Overs::BALLS_PER_OVER,
                w.dot_balls
            ));
        }
        if w.wickets > MAX_WICKETS_PER_INNINGS {
            return self.reject(format!("{} wickets exceed an innings", w.wickets));
        }
        let deliveries = u64::from(balls) + u64::from(w.wides) + u64::from(w.no_balls);
        if deliveries > u64::from(u32::MAX) {
            return self.reject(format!("{} deliveries cannot be counted", deliveries));
        }
        if u64::from(w.wickets) > deliveries {
            return self.reject(format!("{} wickets from {} deliveries", w.wickets, deliveries));
        }
        let scoring_deliveries = u64::from(balls - w.dot_balls) + u64::from(w.wides) + u64::from(w.no_balls);
        if w.runs_conceded > 0 && scoring_deliveries == 0 {
            return self.reject(format!(
                "{} runs conceded but every delivery was a dot ball",
                w.runs_conceded
            ));
        }
        Ok(())
    }

    fn validate_context(&self) -> Result<(), ScoringError> {
        let checks = [
            ("batting_strike_rate", self.context.batting_strike_rate),
            ("bowling_economy", self.context.bowling_economy),
        ];
        for (field, value) in checks {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return self.reject(format!("innings average {} must be positive, got {}", field, v));
                }
            }
        }
        Ok(())
    }
}
