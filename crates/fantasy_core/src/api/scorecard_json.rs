//! Scorecard JSON in, per-player breakdowns out.
//!
//! Input is the scraper's document: one entry per team holding the team's
//! innings averages and a `player_stats` map of loosely typed records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::error::{PlayerId, ScoringError};
use crate::models::{
    BattingFacet, BowlingFacet, FieldingFacet, InningsContext, Overs, RawPerformance, RoleRegistry,
    ScoreBreakdown,
};
use crate::rules::ScoringRuleSet;
use crate::scoring::score_match;
use crate::SCHEMA_VERSION;

/// A yes/no flag written either as a JSON boolean or as text (`"Yes"`, `"No"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    fn resolve(&self, player: &str, field: &str) -> Result<bool, ScoringError> {
        match self {
            Flag::Bool(b) => Ok(*b),
            Flag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "yes" | "y" | "true" => Ok(true),
                "no" | "n" | "false" | "" => Ok(false),
                _ => Err(ScoringError::invalid(player, format!("{field}: `{text}` is not a yes/no flag"))),
            },
        }
    }
}

/// One player's statistics as the scraper writes them.
///
/// Counts are signed so a corrupt negative value reaches validation instead
/// of failing JSON parsing without the player's name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPerformanceRecord {
    pub runs_scored: i64,
    pub balls_faced: i64,
    pub fours: i64,
    pub sixes: i64,
    pub did_not_bat: Option<Flag>,
    /// Absent means "out" whenever the player batted.
    pub dismissed: Option<Flag>,
    /// Cricket notation: `3.4` is three overs and four balls.
    pub overs: f64,
    pub runs_conceded: Option<i64>,
    /// Used to recover runs conceded when the scorecard only lists economy.
    pub economy: Option<f64>,
    pub wickets: i64,
    pub maiden: i64,
    pub dots: i64,
    pub wides: i64,
    pub no_balls: i64,
    pub catches: i64,
    pub stumping: i64,
    /// Run-out credit; a fractional share marks a run-out effected with others.
    pub run_outs: f64,
    pub run_outs_direct: i64,
    pub run_outs_assisted: i64,
    pub potm: Option<Flag>,
}

fn count(player: &str, field: &str, value: i64) -> Result<u32, ScoringError> {
    u32::try_from(value).map_err(|_| ScoringError::invalid(player, format!("{field}: {value} is not a valid count")))
}

/// Sum of two counts feeding one field.
fn combined(player: &str, field: &str, a: u32, b: u32) -> Result<u32, ScoringError> {
    a.checked_add(b)
        .ok_or_else(|| ScoringError::invalid(player, format!("{field}: {a} + {b} is not a valid count")))
}

impl RawPerformanceRecord {
    fn batting(&self, player: &str) -> Result<BattingFacet, ScoringError> {
        let runs = count(player, "runs_scored", self.runs_scored)?;
        let balls_faced = count(player, "balls_faced", self.balls_faced)?;
        let batted = match &self.did_not_bat {
            Some(flag) => !flag.resolve(player, "did_not_bat")?,
            None => runs > 0 || balls_faced > 0,
        };
        let dismissed = match &self.dismissed {
            Some(flag) => flag.resolve(player, "dismissed")?,
            None => batted,
        };
        Ok(BattingFacet {
            runs,
            balls_faced,
            fours: count(player, "fours", self.fours)?,
            sixes: count(player, "sixes", self.sixes)?,
            batted,
            dismissed,
        })
    }

    fn bowling(&self, player: &str) -> Result<BowlingFacet, ScoringError> {
        let overs = Overs::from_notation(self.overs)
            .ok_or_else(|| ScoringError::invalid(player, format!("overs: {} is not legal over notation", self.overs)))?;
        let runs_conceded = match (self.runs_conceded, self.economy) {
            (Some(runs), _) => count(player, "runs_conceded", runs)?,
            (None, _) if overs.is_zero() => 0,
            (None, Some(economy)) if economy.is_finite() && economy >= 0.0 => {
                let runs = (economy * overs.as_f64()).round();
                count(player, "economy", runs as i64)?
            }
            (None, Some(economy)) => {
                return Err(ScoringError::invalid(player, format!("economy: {economy} is not a valid rate")))
            }
            (None, None) => {
                return Err(ScoringError::invalid(player, format!("{overs} overs bowled without runs conceded or economy")))
            }
        };
        Ok(BowlingFacet {
            overs,
            runs_conceded,
            wickets: count(player, "wickets", self.wickets)?,
            maidens: count(player, "maiden", self.maiden)?,
            dot_balls: count(player, "dots", self.dots)?,
            wides: count(player, "wides", self.wides)?,
            no_balls: count(player, "no_balls", self.no_balls)?,
        })
    }

    fn fielding(&self, player: &str) -> Result<FieldingFacet, ScoringError> {
        if !self.run_outs.is_finite() || self.run_outs < 0.0 {
            return Err(ScoringError::invalid(player, format!("run_outs: {} is not a valid credit", self.run_outs)));
        }
        let whole = self.run_outs.trunc();
        let shared = u32::from(self.run_outs > whole);
        let direct = combined(
            player,
            "run_outs_direct",
            count(player, "run_outs_direct", self.run_outs_direct)?,
            count(player, "run_outs", whole as i64)?,
        )?;
        let assisted = combined(
            player,
            "run_outs_assisted",
            count(player, "run_outs_assisted", self.run_outs_assisted)?,
            shared,
        )?;
        Ok(FieldingFacet {
            catches: count(player, "catches", self.catches)?,
            stumpings: count(player, "stumping", self.stumping)?,
            run_outs_direct: direct,
            run_outs_assisted: assisted,
        })
    }
}

impl TryFrom<(PlayerId, RawPerformanceRecord, InningsContext)> for RawPerformance {
    type Error = ScoringError;

    fn try_from(
        (player, record, context): (PlayerId, RawPerformanceRecord, InningsContext),
    ) -> Result<Self, Self::Error> {
        let player_of_the_match = match &record.potm {
            Some(flag) => flag.resolve(&player, "potm")?,
            None => false,
        };
        Ok(RawPerformance {
            batting: record.batting(&player)?,
            bowling: record.bowling(&player)?,
            fielding: record.fielding(&player)?,
            player_of_the_match,
            context,
            player,
        })
    }
}

/// One team's section of a scorecard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamScorecard {
    /// Strike rate of this team's batting innings; zero when unknown.
    pub average_strike_rate: f64,
    /// Economy conceded by this team's bowlers; zero when unknown.
    pub average_economy: f64,
    pub player_stats: BTreeMap<PlayerId, RawPerformanceRecord>,
}

impl TeamScorecard {
    pub fn context(&self) -> InningsContext {
        let known = |v: f64| (v.is_finite() && v > 0.0).then_some(v);
        InningsContext {
            batting_strike_rate: known(self.average_strike_rate),
            bowling_economy: known(self.average_economy),
        }
    }

    pub fn performances(&self) -> Result<Vec<RawPerformance>, ScoringError> {
        let context = self.context();
        self.player_stats
            .iter()
            .map(|(player, record)| RawPerformance::try_from((player.clone(), record.clone(), context)))
            .collect()
    }
}

/// Team name to team section.
pub type ScorecardDocument = BTreeMap<String, TeamScorecard>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamScores {
    pub total: f64,
    pub players: BTreeMap<PlayerId, ScoreBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardResponse {
    pub schema_version: u8,
    pub rule_set: String,
    pub teams: BTreeMap<String, TeamScores>,
}

/// Score every player of every team in the document.
pub fn score_scorecard(
    scorecard: &ScorecardDocument,
    registry: &RoleRegistry,
    rules: &ScoringRuleSet,
) -> Result<ScorecardResponse, ScoringError> {
    let mut teams = BTreeMap::new();
    for (team, card) in scorecard {
        let players = score_match(&card.performances()?, registry, rules)?;
        let total: f64 = players.values().map(|b| b.total).sum();
        info!(team = %team, players = players.len(), total, "Team scored");
        teams.insert(team.clone(), TeamScores { total, players });
    }
    Ok(ScorecardResponse { schema_version: SCHEMA_VERSION, rule_set: rules.name().to_string(), teams })
}

/// JSON wrapper of [`score_scorecard`], returning pretty-printed JSON.
pub fn score_scorecard_json(
    json: &str,
    registry: &RoleRegistry,
    rules: &ScoringRuleSet,
) -> crate::error::Result<String> {
    let scorecard: ScorecardDocument = serde_json::from_str(json)?;
    let response = score_scorecard(&scorecard, registry, rules)?;
    Ok(serde_json::to_string_pretty(&response)?)
}
