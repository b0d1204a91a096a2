use super::{per_event, percent_difference, required};
use crate::error::ScoringError;
use crate::models::{BattingDetail, BattingFacet, InningsContext};
use crate::rules::BattingRules;

pub(super) fn score(
    player: &str,
    facet: &BattingFacet,
    context: &InningsContext,
    rules: &BattingRules,
) -> Result<BattingDetail, ScoringError> {
    let runs = per_event(facet.runs, rules.per_run, player, "batting.per_run")?;
    let boundaries = per_event(facet.fours, rules.four, player, "batting.four")?
        + per_event(facet.sixes, rules.six, player, "batting.six")?;

    let duck = if facet.is_duck() {
        required(rules.duck, player, "batting.duck")?
    } else {
        0.0
    };

    let milestone = if facet.runs > 0 {
        required(rules.milestones.as_ref(), player, "batting.milestones")?.points(facet.runs)
    } else {
        0.0
    };

    let (strike_rate, differential) = match facet.strike_rate() {
        Some(sr) => {
            let sr_rules = required(rules.strike_rate.as_ref(), player, "batting.strike_rate")?;
            let bonus = if facet.runs >= sr_rules.bonus_min_runs {
                sr_rules.rate.reward(sr, facet.balls_faced)
            } else {
                0.0
            };
            let adjustment = bonus + sr_rules.rate.penalty(sr, facet.balls_faced);

            let differential = match context.batting_strike_rate {
                Some(average) => {
                    let diff = required(rules.differential.as_ref(), player, "batting.differential")?;
                    diff.adjustment(percent_difference(sr, average), facet.balls_faced)
                }
                None => 0.0,
            };
            (adjustment, differential)
        }
        None => (0.0, 0.0),
    };

    Ok(BattingDetail { runs, boundaries, milestone, duck, strike_rate, differential })
}
