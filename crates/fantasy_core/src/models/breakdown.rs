use serde::{Deserialize, Serialize};

use crate::rules::FacetWeights;

/// Points earned per batting rule, before role weighting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BattingDetail {
    pub runs: f64,
    pub boundaries: f64,
    pub milestone: f64,
    pub duck: f64,
    pub strike_rate: f64,
    pub differential: f64,
}

impl BattingDetail {
    pub fn total(&self) -> f64 {
        self.runs + self.boundaries + self.milestone + self.duck + self.strike_rate + self.differential
    }
}

/// Points earned per bowling rule, before role weighting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BowlingDetail {
    pub wickets: f64,
    pub hauls: f64,
    pub maidens: f64,
    pub dot_balls: f64,
    pub extras: f64,
    pub economy: f64,
    pub differential: f64,
}

impl BowlingDetail {
    pub fn total(&self) -> f64 {
        self.wickets
            + self.hauls
            + self.maidens
            + self.dot_balls
            + self.extras
            + self.economy
            + self.differential
    }
}

/// Role weighting that produced the final sub-totals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum AppliedMultiplier {
    #[default]
    Identity,
    PerFacet { weights: FacetWeights },
    GrandTotal { factor: f64 },
}

/// Final points for one player in one match.
///
/// `batting`, `bowling`, `fielding` and `award` are role-weighted and, unless
/// the rule set allows negative sub-totals, floored at zero. `total` is their
/// sum. The detail structs keep the unweighted per-rule points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub batting: f64,
    pub bowling: f64,
    pub fielding: f64,
    pub award: f64,
    pub total: f64,
    pub multiplier: AppliedMultiplier,
    pub batting_detail: BattingDetail,
    pub bowling_detail: BowlingDetail,
}

impl ScoreBreakdown {
    pub fn is_zero(&self) -> bool {
        self.batting == 0.0
            && self.bowling == 0.0
            && self.fielding == 0.0
            && self.award == 0.0
            && self.total == 0.0
    }
}
