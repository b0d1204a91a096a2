use super::per_event;
use crate::error::ScoringError;
use crate::models::FieldingFacet;
use crate::rules::FieldingRules;

/// Linear in every count: doubling the counts doubles the points.
pub(super) fn score(player: &str, facet: &FieldingFacet, rules: &FieldingRules) -> Result<f64, ScoringError> {
    Ok(per_event(facet.catches, rules.catch, player, "fielding.catch")?
        + per_event(facet.stumpings, rules.stumping, player, "fielding.stumping")?
        + per_event(facet.run_outs_direct, rules.run_out_direct, player, "fielding.run_out_direct")?
        + per_event(facet.run_outs_assisted, rules.run_out_assisted, player, "fielding.run_out_assisted")?)
}
