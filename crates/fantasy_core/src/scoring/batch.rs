//! Whole-match scoring across the rayon pool.

use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use super::score;
use crate::error::{PlayerId, ScoringError};
use crate::models::{RawPerformance, RoleRegistry, ScoreBreakdown};
use crate::rules::ScoringRuleSet;

/// Result of [`score_match_lenient`]: the players that scored and the
/// record-level failures that were set aside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LenientOutcome {
    pub scored: BTreeMap<PlayerId, ScoreBreakdown>,
    pub rejected: Vec<ScoringError>,
}

fn score_one(
    performance: &RawPerformance,
    registry: &RoleRegistry,
    rules: &ScoringRuleSet,
) -> Result<ScoreBreakdown, ScoringError> {
    let role = registry.require(&performance.player)?;
    score(performance, role, rules)
}

/// Score every player of a match in parallel.
///
/// All players are scored against the same `rules` snapshot. The first
/// failure in input order is returned; a player listed twice is
/// [`ScoringError::InvalidPerformanceData`].
pub fn score_match(
    performances: &[RawPerformance],
    registry: &RoleRegistry,
    rules: &ScoringRuleSet,
) -> Result<BTreeMap<PlayerId, ScoreBreakdown>, ScoringError> {
    let mut seen = HashSet::with_capacity(performances.len());
    if let Some(dup) = performances.iter().find(|p| !seen.insert(p.player.as_str())) {
        return Err(ScoringError::invalid(&dup.player, "player listed more than once in the match"));
    }

    let results: Vec<Result<ScoreBreakdown, ScoringError>> = performances
        .par_iter()
        .map(|p| score_one(p, registry, rules))
        .collect();

    let mut scored = BTreeMap::new();
    for (performance, result) in performances.iter().zip(results) {
        match result {
            Ok(breakdown) => {
                scored.insert(performance.player.clone(), breakdown);
            }
            Err(err) => {
                warn!(player = %performance.player, error = %err, rule_set = rules.name(), "Match scoring aborted");
                return Err(err);
            }
        }
    }

    debug!(players = scored.len(), rule_set = rules.name(), "Match scored");
    Ok(scored)
}

/// Like [`score_match`], but players whose own record is defective (invalid
/// data, unregistered role, repeated entry) are set aside instead of failing
/// the batch.
///
/// # Errors
///
/// A [`ScoringError::MissingRuleDefinition`] still fails the whole batch,
/// since it points at the rule set rather than at one record.
pub fn score_match_lenient(
    performances: &[RawPerformance],
    registry: &RoleRegistry,
    rules: &ScoringRuleSet,
) -> Result<LenientOutcome, ScoringError> {
    let mut seen = HashSet::with_capacity(performances.len());
    let firsts: Vec<bool> = performances.iter().map(|p| seen.insert(p.player.as_str())).collect();

    let results: Vec<Result<ScoreBreakdown, ScoringError>> = performances
        .par_iter()
        .zip(firsts.par_iter())
        .map(|(p, first)| {
            if *first {
                score_one(p, registry, rules)
            } else {
                Err(ScoringError::invalid(&p.player, "player listed more than once in the match"))
            }
        })
        .collect();

    let mut outcome = LenientOutcome::default();
    for (performance, result) in performances.iter().zip(results) {
        match result {
            Ok(breakdown) => {
                outcome.scored.insert(performance.player.clone(), breakdown);
            }
            Err(err) if err.is_record_defect() => {
                warn!(player = %performance.player, error = %err, "Player skipped");
                outcome.rejected.push(err);
            }
            Err(err) => return Err(err),
        }
    }

    debug!(
        scored = outcome.scored.len(),
        rejected = outcome.rejected.len(),
        rule_set = rules.name(),
        "Match scored leniently"
    );
    Ok(outcome)
}
