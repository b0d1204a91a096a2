use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::PlayerRole;

/// How role multipliers combine the four facet sub-totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MultiplierPolicy {
    /// Each facet sub-total is weighted separately for the player's role.
    PerFacet,
    /// One factor per role scales the grand total.
    GrandTotal,
}

/// Per-facet weights for one role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FacetWeights {
    pub batting: f64,
    pub bowling: f64,
    pub fielding: f64,
    pub award: f64,
}

impl FacetWeights {
    pub const IDENTITY: FacetWeights =
        FacetWeights { batting: 1.0, bowling: 1.0, fielding: 1.0, award: 1.0 };

    pub fn uniform(factor: f64) -> Self {
        Self { batting: factor, bowling: factor, fielding: factor, award: factor }
    }
}

impl Default for FacetWeights {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One value per role. Lookup is an exhaustive match, so a new role cannot be missed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleTable<T> {
    pub batter: T,
    pub bowler: T,
    pub allrounder: T,
    pub keeper: T,
}

impl<T: Copy> RoleTable<T> {
    pub fn get(&self, role: PlayerRole) -> T {
        match role {
            PlayerRole::Batter => self.batter,
            PlayerRole::Bowler => self.bowler,
            PlayerRole::Allrounder => self.allrounder,
            PlayerRole::Keeper => self.keeper,
        }
    }

    pub fn uniform(value: T) -> Self {
        Self { batter: value, bowler: value, allrounder: value, keeper: value }
    }
}

/// Validated role weighting of a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", content = "table", rename_all = "snake_case")]
pub enum RoleMultipliers {
    /// No role weighting configured.
    #[default]
    Identity,
    PerFacet(RoleTable<FacetWeights>),
    GrandTotal(RoleTable<f64>),
}

impl RoleMultipliers {
    pub fn policy(&self) -> Option<MultiplierPolicy> {
        match self {
            RoleMultipliers::Identity => None,
            RoleMultipliers::PerFacet(_) => Some(MultiplierPolicy::PerFacet),
            RoleMultipliers::GrandTotal(_) => Some(MultiplierPolicy::GrandTotal),
        }
    }
}
