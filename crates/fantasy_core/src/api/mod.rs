//! JSON entry points for callers outside Rust.

pub mod scorecard_json;

pub use scorecard_json::{
    score_scorecard, score_scorecard_json, Flag, RawPerformanceRecord, ScorecardDocument,
    ScorecardResponse, TeamScorecard, TeamScores,
};
