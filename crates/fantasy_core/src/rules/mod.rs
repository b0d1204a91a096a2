//! # Scoring rule sets
//!
//! A rule set is read once from a [`RuleSetDocument`] (JSON or YAML), checked,
//! and frozen into a [`ScoringRuleSet`]. Scoring only ever sees the frozen
//! form, shared by reference or through a [`RuleBook`] snapshot.
//!
//! ## Presets
//!
//! ```rust
//! use fantasy_core::rules::ScoringRuleSet;
//!
//! let standard = ScoringRuleSet::standard();
//! let flat = ScoringRuleSet::flat();
//! assert_ne!(standard.name(), flat.name());
//!
//! // FANTASY_RULESET_PROFILE=flat selects the flat preset
//! let from_env = ScoringRuleSet::from_env_or_default();
//! # let _ = from_env;
//! ```

mod book;
mod document;
mod multipliers;
mod presets;
mod tiers;

pub use book::RuleBook;
pub use document::{
    rule_set_schema, AwardDocument, BattingDocument, BowlingDocument, DifferentialDocument,
    EconomyDocument, FieldingDocument, MilestoneTierDocument, MilestonesDocument,
    RateTierDocument, RoleMultipliersDocument, RuleSetDocument, StrikeRateDocument,
};
pub use multipliers::{FacetWeights, MultiplierPolicy, RoleMultipliers, RoleTable};
pub use presets::{flat_rules, standard_rules, FLAT_RULESET_YAML, STANDARD_RULESET_YAML};
pub use tiers::{Direction, Milestone, MilestoneTable, RateRules, ThresholdBoundary, Tier, TierTable};

use serde::Serialize;
use std::collections::BTreeMap;
use std::env;

use crate::error::RuleSetError;
use crate::models::{Overs, PlayerRole};

/// Environment variable naming the preset used by [`ScoringRuleSet::from_env_or_default`].
pub const RULESET_PROFILE_ENV: &str = "FANTASY_RULESET_PROFILE";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrikeRateRules {
    pub rate: RateRules,
    pub bonus_min_runs: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BattingRules {
    pub per_run: Option<f64>,
    pub four: Option<f64>,
    pub six: Option<f64>,
    pub duck: Option<f64>,
    pub milestones: Option<MilestoneTable>,
    pub strike_rate: Option<StrikeRateRules>,
    pub differential: Option<RateRules>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BowlingRules {
    pub per_wicket: Option<f64>,
    pub wicket_hauls: Option<MilestoneTable>,
    pub maiden: Option<f64>,
    pub dot_ball: Option<f64>,
    pub wide: Option<f64>,
    pub no_ball: Option<f64>,
    pub economy: Option<RateRules>,
    pub differential: Option<RateRules>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FieldingRules {
    pub catch: Option<f64>,
    pub stumping: Option<f64>,
    pub run_out_direct: Option<f64>,
    pub run_out_assisted: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AwardRules {
    pub player_of_the_match: Option<f64>,
}

/// Validated, immutable scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringRuleSet {
    name: String,
    batting: BattingRules,
    bowling: BowlingRules,
    fielding: FieldingRules,
    awards: AwardRules,
    multipliers: RoleMultipliers,
    allow_negative_subtotals: bool,
}

impl ScoringRuleSet {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn batting(&self) -> &BattingRules {
        &self.batting
    }

    pub fn bowling(&self) -> &BowlingRules {
        &self.bowling
    }

    pub fn fielding(&self) -> &FieldingRules {
        &self.fielding
    }

    pub fn awards(&self) -> &AwardRules {
        &self.awards
    }

    pub fn multipliers(&self) -> &RoleMultipliers {
        &self.multipliers
    }

    pub fn allow_negative_subtotals(&self) -> bool {
        self.allow_negative_subtotals
    }

    /// IPL-style preset with every rule family configured.
    pub fn standard() -> Self {
        standard_rules().clone()
    }

    /// Linear per-event points with empty tier tables and no role weighting.
    pub fn flat() -> Self {
        flat_rules().clone()
    }

    /// Preset named by `FANTASY_RULESET_PROFILE` (`standard`, `flat`), else standard.
    pub fn from_env_or_default() -> Self {
        match env::var(RULESET_PROFILE_ENV).unwrap_or_default().to_lowercase().as_str() {
            "flat" => Self::flat(),
            _ => Self::standard(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, RuleSetError> {
        let doc: RuleSetDocument =
            serde_json::from_str(json).map_err(|e| RuleSetError::Parse(e.to_string()))?;
        Self::from_document(doc)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, RuleSetError> {
        let doc: RuleSetDocument =
            serde_yaml::from_str(yaml).map_err(|e| RuleSetError::Parse(e.to_string()))?;
        Self::from_document(doc)
    }

    /// Check a document and freeze it. Every defect is reported here, before
    /// any player is scored.
    pub fn from_document(doc: RuleSetDocument) -> Result<Self, RuleSetError> {
        let name = doc.name.clone().unwrap_or_else(|| "custom".to_string());
        let check = Checker { rule_set: &name };

        let multipliers = check.multipliers(doc.role_multipliers.as_ref())?;
        let batting = check.batting(&doc.batting)?;
        let bowling = check.bowling(&doc.bowling)?;
        let fielding = FieldingRules {
            catch: check.finite("fielding.catch", doc.fielding.catch)?,
            stumping: check.finite("fielding.stumping", doc.fielding.stumping)?,
            run_out_direct: check.finite("fielding.run_out_direct", doc.fielding.run_out_direct)?,
            run_out_assisted: check
                .finite("fielding.run_out_assisted", doc.fielding.run_out_assisted)?,
        };
        let awards = AwardRules {
            player_of_the_match: check
                .finite("awards.player_of_the_match", doc.awards.player_of_the_match)?,
        };

        Ok(Self {
            name,
            batting,
            bowling,
            fielding,
            awards,
            multipliers,
            allow_negative_subtotals: doc.allow_negative_subtotals,
        })
    }
}

#[derive(Clone, Copy)]
enum Side {
    Reward,
    Penalty,
}

struct Checker<'a> {
    rule_set: &'a str,
}

impl Checker<'_> {
    fn invalid(&self, rule: &str, reason: impl Into<String>) -> RuleSetError {
        RuleSetError::InvalidRule {
            rule_set: self.rule_set.to_string(),
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }

    fn missing(&self, rule: &str) -> RuleSetError {
        RuleSetError::MissingRuleDefinition {
            rule_set: self.rule_set.to_string(),
            rule: rule.to_string(),
        }
    }

    fn finite(&self, rule: &str, value: Option<f64>) -> Result<Option<f64>, RuleSetError> {
        match value {
            Some(v) if !v.is_finite() => Err(self.invalid(rule, format!("{} is not finite", v))),
            other => Ok(other),
        }
    }

    fn non_negative(&self, rule: &str, value: Option<f64>) -> Result<Option<f64>, RuleSetError> {
        match self.finite(rule, value)? {
            Some(v) if v < 0.0 => Err(self.invalid(rule, format!("{} must not be negative", v))),
            other => Ok(other),
        }
    }

    fn non_positive(&self, rule: &str, value: Option<f64>) -> Result<Option<f64>, RuleSetError> {
        match self.finite(rule, value)? {
            Some(v) if v > 0.0 => Err(self.invalid(rule, format!("{} must not be positive", v))),
            other => Ok(other),
        }
    }

    fn batting(&self, doc: &BattingDocument) -> Result<BattingRules, RuleSetError> {
        let strike_rate = match &doc.strike_rate {
            Some(sr) => {
                if sr.min_balls == 0 {
                    return Err(self.invalid("batting.strike_rate.min_balls", "must be at least 1"));
                }
                Some(StrikeRateRules {
                    rate: RateRules {
                        min_sample: sr.min_balls,
                        boundary: sr.boundary,
                        rewards: self.rate_table(
                            "batting.strike_rate.bonuses",
                            Direction::Above,
                            Side::Reward,
                            &sr.bonuses,
                        )?,
                        penalties: self.rate_table(
                            "batting.strike_rate.penalties",
                            Direction::Below,
                            Side::Penalty,
                            &sr.penalties,
                        )?,
                    },
                    bonus_min_runs: sr.bonus_min_runs,
                })
            }
            None => None,
        };

        let differential = match &doc.differential {
            Some(d) => Some(self.differential("batting.differential", d, Side::Reward)?),
            None => None,
        };

        Ok(BattingRules {
            // Negative run value would make more runs worth less.
            per_run: self.non_negative("batting.per_run", doc.per_run)?,
            four: self.finite("batting.four", doc.four)?,
            six: self.finite("batting.six", doc.six)?,
            duck: self.non_positive("batting.duck", doc.duck)?,
            milestones: self.milestones("batting.milestones", doc.milestones.as_ref())?,
            strike_rate,
            differential,
        })
    }

    fn bowling(&self, doc: &BowlingDocument) -> Result<BowlingRules, RuleSetError> {
        let economy = match &doc.economy {
            Some(eco) => {
                let min = Overs::from_notation(eco.min_overs).ok_or_else(|| {
                    self.invalid(
                        "bowling.economy.min_overs",
                        format!("{} is not valid over notation", eco.min_overs),
                    )
                })?;
                if min.is_zero() {
                    return Err(self.invalid("bowling.economy.min_overs", "must be at least one ball"));
                }
                Some(RateRules {
                    min_sample: min.legal_balls(),
                    boundary: eco.boundary,
                    rewards: self.rate_table(
                        "bowling.economy.bonuses",
                        Direction::Below,
                        Side::Reward,
                        &eco.bonuses,
                    )?,
                    penalties: self.rate_table(
                        "bowling.economy.penalties",
                        Direction::Above,
                        Side::Penalty,
                        &eco.penalties,
                    )?,
                })
            }
            None => None,
        };

        let differential = match &doc.differential {
            Some(d) => Some(self.differential("bowling.differential", d, Side::Penalty)?),
            None => None,
        };

        Ok(BowlingRules {
            per_wicket: self.finite("bowling.per_wicket", doc.per_wicket)?,
            wicket_hauls: self.milestones("bowling.wicket_hauls", doc.wicket_hauls.as_ref())?,
            maiden: self.finite("bowling.maiden", doc.maiden)?,
            dot_ball: self.finite("bowling.dot_ball", doc.dot_ball)?,
            wide: self.finite("bowling.wide", doc.wide)?,
            no_ball: self.finite("bowling.no_ball", doc.no_ball)?,
            economy,
            differential,
        })
    }

    /// `higher_side` says whether being above the innings average is rewarded
    /// (batting) or penalised (bowling).
    fn differential(
        &self,
        rule: &str,
        doc: &DifferentialDocument,
        higher_side: Side,
    ) -> Result<RateRules, RuleSetError> {
        if doc.min_sample == 0 {
            return Err(self.invalid(&format!("{rule}.min_sample"), "must be at least 1"));
        }
        let lower_side = match higher_side {
            Side::Reward => Side::Penalty,
            Side::Penalty => Side::Reward,
        };
        self.percentages(&format!("{rule}.higher"), &doc.higher)?;
        self.percentages(&format!("{rule}.lower"), &doc.lower)?;
        let higher =
            self.rate_table(&format!("{rule}.higher"), Direction::Above, higher_side, &doc.higher)?;
        // Below the average means a negative difference.
        let lower_tiers: Vec<RateTierDocument> = doc
            .lower
            .iter()
            .map(|t| RateTierDocument { threshold: -t.threshold, ..t.clone() })
            .collect();
        let lower =
            self.rate_table(&format!("{rule}.lower"), Direction::Below, lower_side, &lower_tiers)?;
        let (rewards, penalties) = match higher_side {
            Side::Reward => (higher, lower),
            Side::Penalty => (lower, higher),
        };
        Ok(RateRules { min_sample: doc.min_sample, boundary: doc.boundary, rewards, penalties })
    }

    fn percentages(&self, rule: &str, tiers: &[RateTierDocument]) -> Result<(), RuleSetError> {
        match tiers.iter().find(|t| t.threshold < 0.0) {
            Some(t) => Err(self.invalid(
                rule,
                format!("percentage threshold {} must not be negative", t.threshold),
            )),
            None => Ok(()),
        }
    }

    fn rate_table(
        &self,
        rule: &str,
        direction: Direction,
        side: Side,
        tiers: &[RateTierDocument],
    ) -> Result<TierTable, RuleSetError> {
        for t in tiers {
            if !t.threshold.is_finite() || !t.points.is_finite() {
                return Err(self.invalid(rule, "thresholds and points must be finite"));
            }
            match side {
                Side::Reward if t.points < 0.0 => {
                    return Err(self.invalid(rule, format!("bonus tier {} pays {}", t.threshold, t.points)))
                }
                Side::Penalty if t.points > 0.0 => {
                    return Err(self.invalid(rule, format!("penalty tier {} pays {}", t.threshold, t.points)))
                }
                _ => {}
            }
        }

        let table = TierTable::new(
            direction,
            tiers
                .iter()
                .map(|t| Tier { threshold: t.threshold, points: t.points, min_sample: t.min_sample })
                .collect(),
        );

        // Most extreme first: thresholds must be distinct and magnitudes must not shrink.
        for pair in table.tiers().windows(2) {
            let (extreme, milder) = (pair[0], pair[1]);
            if extreme.threshold == milder.threshold {
                return Err(self.invalid(rule, format!("duplicate threshold {}", extreme.threshold)));
            }
            if extreme.points.abs() < milder.points.abs() {
                return Err(self.invalid(
                    rule,
                    format!(
                        "tier {} ({}) is worth less than milder tier {} ({})",
                        extreme.threshold, extreme.points, milder.threshold, milder.points
                    ),
                ));
            }
        }
        Ok(table)
    }

    fn milestones(
        &self,
        rule: &str,
        doc: Option<&MilestonesDocument>,
    ) -> Result<Option<MilestoneTable>, RuleSetError> {
        let Some(doc) = doc else {
            return Ok(None);
        };
        for tier in &doc.tiers {
            if tier.at == 0 {
                return Err(self.invalid(rule, "milestone at 0 is always reached"));
            }
            if !tier.points.is_finite() || tier.points < 0.0 {
                return Err(self.invalid(rule, format!("milestone {} pays {}", tier.at, tier.points)));
            }
        }
        let table = MilestoneTable::new(
            doc.additive,
            doc.tiers.iter().map(|t| Milestone { at: t.at, points: t.points }).collect(),
        );
        for pair in table.milestones().windows(2) {
            if pair[0].at == pair[1].at {
                return Err(self.invalid(rule, format!("duplicate milestone {}", pair[0].at)));
            }
            if !doc.additive && pair[1].points < pair[0].points {
                return Err(self.invalid(
                    rule,
                    format!("milestone {} pays less than milestone {}", pair[1].at, pair[0].at),
                ));
            }
        }
        Ok(Some(table))
    }

    fn multipliers(
        &self,
        doc: Option<&RoleMultipliersDocument>,
    ) -> Result<RoleMultipliers, RuleSetError> {
        let Some(doc) = doc else {
            return Ok(RoleMultipliers::Identity);
        };
        match (doc.policy, &doc.per_facet, &doc.grand_total) {
            (None, None, None) => Ok(RoleMultipliers::Identity),
            (None, _, _) => Err(RuleSetError::AmbiguousRoleMultiplierPolicy {
                rule_set: self.rule_set.to_string(),
            }),
            (Some(_), Some(_), Some(_)) => Err(self.invalid(
                "role_multipliers",
                "both per_facet and grand_total tables supplied",
            )),
            (Some(MultiplierPolicy::PerFacet), Some(table), None) => {
                let table = self.role_table("role_multipliers.per_facet", table)?;
                for role in PlayerRole::ALL {
                    let w = table.get(role);
                    for (facet, v) in
                        [("batting", w.batting), ("bowling", w.bowling), ("fielding", w.fielding), ("award", w.award)]
                    {
                        self.non_negative(&format!("role_multipliers.per_facet.{role}.{facet}"), Some(v))?;
                    }
                }
                Ok(RoleMultipliers::PerFacet(table))
            }
            (Some(MultiplierPolicy::GrandTotal), None, Some(table)) => {
                let table = self.role_table("role_multipliers.grand_total", table)?;
                for role in PlayerRole::ALL {
                    self.non_negative(&format!("role_multipliers.grand_total.{role}"), Some(table.get(role)))?;
                }
                Ok(RoleMultipliers::GrandTotal(table))
            }
            (Some(MultiplierPolicy::PerFacet), None, _) => {
                Err(self.missing("role_multipliers.per_facet"))
            }
            (Some(MultiplierPolicy::GrandTotal), _, None) => {
                Err(self.missing("role_multipliers.grand_total"))
            }
        }
    }

    fn role_table<T: Copy>(
        &self,
        rule: &str,
        map: &BTreeMap<PlayerRole, T>,
    ) -> Result<RoleTable<T>, RuleSetError> {
        let lookup = |role: PlayerRole| {
            map.get(&role).copied().ok_or_else(|| self.missing(&format!("{rule}.{role}")))
        };
        Ok(RoleTable {
            batter: lookup(PlayerRole::Batter)?,
            bowler: lookup(PlayerRole::Bowler)?,
            allrounder: lookup(PlayerRole::Allrounder)?,
            keeper: lookup(PlayerRole::Keeper)?,
        })
    }
}
