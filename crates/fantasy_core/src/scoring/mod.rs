//! # Scoring engine
//!
//! [`score`] turns one validated [`RawPerformance`] into a [`ScoreBreakdown`]
//! under a [`ScoringRuleSet`]. It is a pure function: no I/O, no logging, no
//! shared state, and the facet sums are always added in the same order so
//! identical inputs give bit-identical output.
//!
//! A rule the rule set leaves undefined is only an error when the record
//! actually needs it; an all-zero record scores zero under any rule set.

mod batch;
mod batting;
mod bowling;
mod fielding;

pub use batch::{score_match, score_match_lenient, LenientOutcome};

use crate::error::ScoringError;
use crate::models::{AppliedMultiplier, BattingDetail, BowlingDetail, PlayerRole, RawPerformance, ScoreBreakdown};
use crate::rules::{AwardRules, FacetWeights, RoleMultipliers, ScoringRuleSet};

/// Score one player's match.
///
/// # Errors
///
/// * [`ScoringError::InvalidPerformanceData`] when the record is inconsistent.
/// * [`ScoringError::MissingRuleDefinition`] when the record triggers a rule
///   the rule set does not define.
pub fn score(
    performance: &RawPerformance,
    role: PlayerRole,
    rules: &ScoringRuleSet,
) -> Result<ScoreBreakdown, ScoringError> {
    performance.validate()?;
    let player = performance.player.as_str();

    let batting = batting::score(player, &performance.batting, &performance.context, rules.batting())?;
    let bowling = bowling::score(player, &performance.bowling, &performance.context, rules.bowling())?;
    let fielding = fielding::score(player, &performance.fielding, rules.fielding())?;
    let award = award(player, performance.player_of_the_match, rules.awards())?;

    Ok(aggregate(role, rules, batting, bowling, fielding, award))
}

fn award(player: &str, player_of_the_match: bool, rules: &AwardRules) -> Result<f64, ScoringError> {
    if !player_of_the_match {
        return Ok(0.0);
    }
    required(rules.player_of_the_match, player, "awards.player_of_the_match")
}

/// Floor (unless negatives are allowed) then weight each facet for `role`.
fn aggregate(
    role: PlayerRole,
    rules: &ScoringRuleSet,
    batting_detail: BattingDetail,
    bowling_detail: BowlingDetail,
    fielding: f64,
    award: f64,
) -> ScoreBreakdown {
    let floor = |points: f64| {
        if rules.allow_negative_subtotals() {
            points
        } else {
            points.max(0.0)
        }
    };

    let (weights, multiplier) = match rules.multipliers() {
        RoleMultipliers::Identity => (FacetWeights::IDENTITY, AppliedMultiplier::Identity),
        RoleMultipliers::PerFacet(table) => {
            let weights = table.get(role);
            (weights, AppliedMultiplier::PerFacet { weights })
        }
        // Scaling every facet by the same factor scales their sum by it too.
        RoleMultipliers::GrandTotal(table) => {
            let factor = table.get(role);
            (FacetWeights::uniform(factor), AppliedMultiplier::GrandTotal { factor })
        }
    };

    let batting = floor(batting_detail.total()) * weights.batting;
    let bowling = floor(bowling_detail.total()) * weights.bowling;
    let fielding = floor(fielding) * weights.fielding;
    let award = floor(award) * weights.award;

    ScoreBreakdown {
        batting,
        bowling,
        fielding,
        award,
        total: batting + bowling + fielding + award,
        multiplier,
        batting_detail,
        bowling_detail,
    }
}

fn required<T>(value: Option<T>, player: &str, rule: &str) -> Result<T, ScoringError> {
    value.ok_or_else(|| ScoringError::missing_rule(player, rule))
}

/// `count × value`, needing the value only when `count` is non-zero.
fn per_event(count: u32, value: Option<f64>, player: &str, rule: &str) -> Result<f64, ScoringError> {
    if count == 0 {
        return Ok(0.0);
    }
    Ok(f64::from(count) * required(value, player, rule)?)
}

/// Signed percentage by which `value` differs from `average`.
fn percent_difference(value: f64, average: f64) -> f64 {
    (value - average) / average * 100.0
}

#[cfg(test)]
mod tests;
