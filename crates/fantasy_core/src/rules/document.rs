//! Loosely typed rule document as written in JSON/YAML configuration.
//!
//! Every point value is optional here. Validation in [`super::ScoringRuleSet`]
//! keeps an absent value absent, so scoring can tell "not configured" apart
//! from an explicit zero.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::multipliers::{FacetWeights, MultiplierPolicy};
use super::tiers::ThresholdBoundary;
use crate::models::PlayerRole;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RuleSetDocument {
    pub name: Option<String>,
    pub batting: BattingDocument,
    pub bowling: BowlingDocument,
    pub fielding: FieldingDocument,
    pub awards: AwardDocument,
    pub role_multipliers: Option<RoleMultipliersDocument>,
    /// Let penalties push a facet sub-total below zero.
    pub allow_negative_subtotals: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct BattingDocument {
    pub per_run: Option<f64>,
    pub four: Option<f64>,
    pub six: Option<f64>,
    pub duck: Option<f64>,
    pub milestones: Option<MilestonesDocument>,
    pub strike_rate: Option<StrikeRateDocument>,
    pub differential: Option<DifferentialDocument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct BowlingDocument {
    pub per_wicket: Option<f64>,
    pub wicket_hauls: Option<MilestonesDocument>,
    pub maiden: Option<f64>,
    pub dot_ball: Option<f64>,
    pub wide: Option<f64>,
    pub no_ball: Option<f64>,
    pub economy: Option<EconomyDocument>,
    pub differential: Option<DifferentialDocument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct FieldingDocument {
    pub catch: Option<f64>,
    pub stumping: Option<f64>,
    pub run_out_direct: Option<f64>,
    pub run_out_assisted: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct AwardDocument {
    pub player_of_the_match: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MilestonesDocument {
    /// Pay every reached milestone instead of only the highest.
    #[serde(default)]
    pub additive: bool,
    pub tiers: Vec<MilestoneTierDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MilestoneTierDocument {
    pub at: u32,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RateTierDocument {
    pub threshold: f64,
    pub points: f64,
    #[serde(default)]
    pub min_sample: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct StrikeRateDocument {
    /// Balls faced before any strike-rate adjustment applies.
    pub min_balls: u32,
    /// Runs needed before a strike-rate bonus applies.
    #[serde(default)]
    pub bonus_min_runs: u32,
    #[serde(default)]
    pub boundary: ThresholdBoundary,
    /// Paid when the strike rate is above the threshold.
    #[serde(default)]
    pub bonuses: Vec<RateTierDocument>,
    /// Charged when the strike rate is below the threshold.
    #[serde(default)]
    pub penalties: Vec<RateTierDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EconomyDocument {
    /// Overs in scorecard notation (`2.1` = 13 balls) before any adjustment.
    pub min_overs: f64,
    #[serde(default)]
    pub boundary: ThresholdBoundary,
    /// Paid when the economy is below the threshold.
    #[serde(default)]
    pub bonuses: Vec<RateTierDocument>,
    /// Charged when the economy is above the threshold.
    #[serde(default)]
    pub penalties: Vec<RateTierDocument>,
}

/// Percentage difference from the innings average.
///
/// `higher` thresholds are how far above the average the player was, `lower`
/// thresholds how far below, both as positive percentages.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DifferentialDocument {
    pub min_sample: u32,
    #[serde(default)]
    pub boundary: ThresholdBoundary,
    #[serde(default)]
    pub higher: Vec<RateTierDocument>,
    #[serde(default)]
    pub lower: Vec<RateTierDocument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RoleMultipliersDocument {
    pub policy: Option<MultiplierPolicy>,
    pub per_facet: Option<BTreeMap<PlayerRole, FacetWeights>>,
    pub grand_total: Option<BTreeMap<PlayerRole, f64>>,
}

/// JSON Schema of [`RuleSetDocument`], pretty-printed.
pub fn rule_set_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(RuleSetDocument);
    serde_json::to_string_pretty(&schema)
}
