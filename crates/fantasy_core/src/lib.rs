//! # fantasy_core - Cricket Fantasy Points Engine
//!
//! Turns per-player match statistics into fantasy points under a
//! configurable rule set, and tracks when a live match is due for a
//! recompute.
//!
//! ## Features
//! - Deterministic scoring (same record + rule set = bit-identical points)
//! - Rule sets validated once at load time (JSON or YAML), immutable afterwards
//! - Role multipliers with an explicit per-facet or grand-total policy
//! - Pure lifecycle state machine with the caller's clock passed in
//! - Parallel whole-match scoring and a JSON API over scraper scorecards

pub mod api;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod rules;
pub mod scoring;

pub use api::{score_scorecard, score_scorecard_json, RawPerformanceRecord, ScorecardResponse};
pub use error::{CoreError, LifecycleError, PlayerId, Result, RuleSetError, ScoringError};
pub use lifecycle::{
    evaluate, Evaluation, MatchBoard, MatchDescriptor, MatchStatus, NextCheck, PollingSchedule,
};
pub use models::{
    BattingFacet, BowlingFacet, FieldingFacet, InningsContext, Overs, PlayerRole, RawPerformance,
    RoleRegistry, ScoreBreakdown,
};
pub use rules::{MultiplierPolicy, RuleBook, ScoringRuleSet};
pub use scoring::{score, score_match, score_match_lenient, LenientOutcome};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scorecard() -> &'static str {
        r#"{
            "Mumbai Indians": {
                "average_strike_rate": 140.0,
                "average_economy": 9.0,
                "player_stats": {
                    "Jasprit Bumrah": {
                        "runs_scored": 5, "balls_faced": 4, "did_not_bat": "No",
                        "overs": 4.0, "runs_conceded": 20, "wickets": 3, "maiden": 1,
                        "dots": 14, "catches": 1, "potm": "Yes"
                    },
                    "Rohit Sharma": {
                        "runs_scored": 64, "balls_faced": 38, "fours": 6, "sixes": 3,
                        "did_not_bat": "No", "dismissed": "No"
                    }
                }
            }
        }"#
    }

    fn registry() -> RoleRegistry {
        RoleRegistry::from_players_json(
            r#"{ "players": [
                { "name": "Jasprit Bumrah", "role": "Bowler" },
                { "name": "Rohit Sharma", "role": "Batter" }
            ] }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_scorecard_pipeline() {
        let json = score_scorecard_json(sample_scorecard(), &registry(), &ScoringRuleSet::standard()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["schema_version"], 1);
        assert_eq!(parsed["rule_set"], "standard");
        assert!(parsed["teams"]["Mumbai Indians"]["players"]["Rohit Sharma"]["total"].is_number());
    }

    #[test]
    fn test_determinism() {
        let rules = ScoringRuleSet::standard();
        let first = score_scorecard_json(sample_scorecard(), &registry(), &rules).unwrap();
        for _ in 0..5 {
            let again = score_scorecard_json(sample_scorecard(), &registry(), &rules).unwrap();
            assert_eq!(first, again, "Same scorecard must produce identical output");
        }
    }

    #[test]
    fn test_snapshot_batch_is_isolated_from_reload() {
        let book = RuleBook::default();
        let snapshot = book.snapshot();
        let before = score_scorecard_json(sample_scorecard(), &registry(), &snapshot).unwrap();

        book.replace(ScoringRuleSet::flat());
        let still = score_scorecard_json(sample_scorecard(), &registry(), &snapshot).unwrap();
        let reloaded = score_scorecard_json(sample_scorecard(), &registry(), &book.snapshot()).unwrap();

        assert_eq!(before, still);
        assert_ne!(before, reloaded);
    }
}
