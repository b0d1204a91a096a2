//! Threshold tables shared by the batting and bowling rules.
//!
//! | Table | Met when | Selected |
//! |-------|----------|----------|
//! | [`TierTable`] `Above` | value above threshold | highest threshold met |
//! | [`TierTable`] `Below` | value below threshold | lowest threshold met |
//! | [`MilestoneTable`] | count reaches threshold | highest reached, or all when additive |
//!
//! A value sitting exactly on a rate threshold only meets that tier when the
//! table's [`ThresholdBoundary`] is `Inclusive`; otherwise it falls to the
//! lower-magnitude neighbour.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a value exactly equal to a tier threshold is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdBoundary {
    /// The threshold must be passed; equality belongs to the milder tier.
    #[default]
    Strict,
    /// Equality meets the tier, i.e. ties go to the higher-magnitude tier.
    Inclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub threshold: f64,
    pub points: f64,
    /// Extra sample-size guard for this tier alone (balls faced or bowled).
    pub min_sample: u32,
}

impl Tier {
    fn is_met(&self, value: f64, sample: u32, direction: Direction, boundary: ThresholdBoundary) -> bool {
        if sample < self.min_sample {
            return false;
        }
        match (direction, boundary) {
            (Direction::Above, ThresholdBoundary::Strict) => value > self.threshold,
            (Direction::Above, ThresholdBoundary::Inclusive) => value >= self.threshold,
            (Direction::Below, ThresholdBoundary::Strict) => value < self.threshold,
            (Direction::Below, ThresholdBoundary::Inclusive) => value <= self.threshold,
        }
    }
}

/// Tiers ordered most extreme first, so the first met tier is the one that applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    direction: Direction,
    tiers: Vec<Tier>,
}

impl TierTable {
    pub fn new(direction: Direction, mut tiers: Vec<Tier>) -> Self {
        match direction {
            Direction::Above => tiers.sort_by(|a, b| b.threshold.total_cmp(&a.threshold)),
            Direction::Below => tiers.sort_by(|a, b| a.threshold.total_cmp(&b.threshold)),
        }
        Self { direction, tiers }
    }

    pub fn empty(direction: Direction) -> Self {
        Self { direction, tiers: Vec::new() }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Tiers from most to least extreme.
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn select(&self, value: f64, sample: u32, boundary: ThresholdBoundary) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.is_met(value, sample, self.direction, boundary))
    }

    pub fn points(&self, value: f64, sample: u32, boundary: ThresholdBoundary) -> f64 {
        self.select(value, sample, boundary).map_or(0.0, |t| t.points)
    }
}

/// A rate (strike rate, economy, differential) with a reward and a penalty side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRules {
    /// No adjustment at all below this many balls.
    pub min_sample: u32,
    pub boundary: ThresholdBoundary,
    pub rewards: TierTable,
    pub penalties: TierTable,
}

impl RateRules {
    /// Adjustment for `value` measured over `sample` balls.
    pub fn adjustment(&self, value: f64, sample: u32) -> f64 {
        if sample == 0 || sample < self.min_sample {
            return 0.0;
        }
        self.rewards.points(value, sample, self.boundary)
            + self.penalties.points(value, sample, self.boundary)
    }

    pub fn reward(&self, value: f64, sample: u32) -> f64 {
        if sample == 0 || sample < self.min_sample {
            return 0.0;
        }
        self.rewards.points(value, sample, self.boundary)
    }

    pub fn penalty(&self, value: f64, sample: u32) -> f64 {
        if sample == 0 || sample < self.min_sample {
            return 0.0;
        }
        self.penalties.points(value, sample, self.boundary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub at: u32,
    pub points: f64,
}

/// Count milestones such as 30/50/100 runs or 3/4/5 wicket hauls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneTable {
    /// When set every reached milestone pays; otherwise only the highest.
    pub additive: bool,
    milestones: Vec<Milestone>,
}

impl MilestoneTable {
    pub fn new(additive: bool, mut milestones: Vec<Milestone>) -> Self {
        milestones.sort_by_key(|m| m.at);
        Self { additive, milestones }
    }

    /// Milestones in ascending order of `at`.
    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn points(&self, count: u32) -> f64 {
        let mut reached = self.milestones.iter().filter(|m| count >= m.at);
        if self.additive {
            reached.map(|m| m.points).sum()
        } else {
            reached.next_back().map_or(0.0, |m| m.points)
        }
    }
}
