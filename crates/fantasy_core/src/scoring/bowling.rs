use super::{per_event, percent_difference, required};
use crate::error::ScoringError;
use crate::models::{BowlingDetail, BowlingFacet, InningsContext};
use crate::rules::BowlingRules;

pub(super) fn score(
    player: &str,
    facet: &BowlingFacet,
    context: &InningsContext,
    rules: &BowlingRules,
) -> Result<BowlingDetail, ScoringError> {
    let wickets = per_event(facet.wickets, rules.per_wicket, player, "bowling.per_wicket")?;
    let hauls = if facet.wickets > 0 {
        required(rules.wicket_hauls.as_ref(), player, "bowling.wicket_hauls")?.points(facet.wickets)
    } else {
        0.0
    };
    let maidens = per_event(facet.maidens, rules.maiden, player, "bowling.maiden")?;
    let dot_balls = per_event(facet.dot_balls, rules.dot_ball, player, "bowling.dot_ball")?;
    let extras = per_event(facet.wides, rules.wide, player, "bowling.wide")?
        + per_event(facet.no_balls, rules.no_ball, player, "bowling.no_ball")?;

    // Minimum overs are held as legal balls, so compare against balls bowled.
    let balls = facet.overs.legal_balls();
    let (economy, differential) = match facet.economy() {
        Some(rate) => {
            let eco_rules = required(rules.economy.as_ref(), player, "bowling.economy")?;
            let differential = match context.bowling_economy {
                Some(average) => {
                    let diff = required(rules.differential.as_ref(), player, "bowling.differential")?;
                    diff.adjustment(percent_difference(rate, average), balls)
                }
                None => 0.0,
            };
            (eco_rules.adjustment(rate, balls), differential)
        }
        None => (0.0, 0.0),
    };

    Ok(BowlingDetail { wickets, hauls, maidens, dot_balls, extras, economy, differential })
}
