//! Points CLI Library
//!
//! File loading and command bodies behind the `fantasy-points` binary.
//! Everything that touches the filesystem lives here; `fantasy_core` only
//! ever sees strings.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fantasy_core::api::{score_scorecard, ScorecardDocument, ScorecardResponse};
use fantasy_core::{MatchBoard, MatchStatus, PollingSchedule, RoleRegistry, ScoringRuleSet};

/// Install the global fmt subscriber; `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("points_cli=info,fantasy_core=info,warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("json") => Ok(Format::Json),
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        _ => bail!("Unsupported file type (expected .json, .yaml or .yml): {}", path.display()),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Rule set from a JSON/YAML file, or the `FANTASY_RULESET_PROFILE` preset when no file is given.
pub fn load_rule_set(path: Option<&Path>) -> Result<ScoringRuleSet> {
    let Some(path) = path else {
        return Ok(ScoringRuleSet::from_env_or_default());
    };
    let text = read(path)?;
    let rules = match format_of(path)? {
        Format::Json => ScoringRuleSet::from_json_str(&text),
        Format::Yaml => ScoringRuleSet::from_yaml_str(&text),
    }
    .with_context(|| format!("Invalid rule set: {}", path.display()))?;
    info!(rule_set = rules.name(), path = %path.display(), "Rule set loaded");
    Ok(rules)
}

pub fn load_registry(path: &Path) -> Result<RoleRegistry> {
    let text = read(path)?;
    let registry = match format_of(path)? {
        Format::Json => RoleRegistry::from_players_json(&text),
        Format::Yaml => RoleRegistry::from_players_yaml(&text),
    }
    .with_context(|| format!("Invalid players file: {}", path.display()))?;
    info!(players = registry.len(), "Role registry loaded");
    Ok(registry)
}

pub fn load_scorecard(path: &Path) -> Result<ScorecardDocument> {
    let text = read(path)?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse scorecard: {}", path.display()))
}

pub fn load_board(path: &Path) -> Result<MatchBoard> {
    let text = read(path)?;
    MatchBoard::from_json_str(&text).with_context(|| format!("Invalid match state file: {}", path.display()))
}

pub fn load_schedule(path: Option<&Path>) -> Result<PollingSchedule> {
    let schedule = match path {
        None => PollingSchedule::default(),
        Some(path) => {
            let text = read(path)?;
            match format_of(path)? {
                Format::Json => serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse schedule: {}", path.display()))?,
                Format::Yaml => serde_yaml::from_str(&text)
                    .with_context(|| format!("Failed to parse schedule: {}", path.display()))?,
            }
        }
    };
    schedule.validate()?;
    Ok(schedule)
}

/// `--now` as RFC 3339, defaulting to the system clock.
pub fn parse_now(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        None => Ok(Utc::now()),
        Some(text) => DateTime::parse_from_rfc3339(text)
            .map(|t| t.with_timezone(&Utc))
            .with_context(|| format!("Invalid --now timestamp: {text}")),
    }
}

/// Write to `out`, or stdout when no path is given.
pub fn write_output(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
            }
            fs::write(path, content).with_context(|| format!("Failed to write output: {}", path.display()))
        }
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

pub fn run_score(
    rules: Option<&Path>,
    players: &Path,
    scorecard: &Path,
    out: Option<&Path>,
) -> Result<ScorecardResponse> {
    let rules = load_rule_set(rules)?;
    let registry = load_registry(players)?;
    let scorecard = load_scorecard(scorecard)?;

    let response = score_scorecard(&scorecard, &registry, &rules)?;
    write_output(out, &serde_json::to_string_pretty(&response)?)?;
    Ok(response)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub match_number: u32,
    pub previous: MatchStatus,
    pub status: MatchStatus,
    pub needs_recompute: bool,
    /// `None` once the match is completed.
    pub next_check_seconds: Option<i64>,
    pub next_check_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifecycleReport {
    pub evaluated_at: String,
    pub matches: Vec<MatchReport>,
}

impl LifecycleReport {
    pub fn due(&self) -> impl Iterator<Item = &MatchReport> {
        self.matches.iter().filter(|m| m.needs_recompute)
    }
}

/// Evaluate every match in the state file at `now`; with `write`, persist the advanced statuses.
pub fn run_lifecycle(
    matches: &Path,
    now: DateTime<Utc>,
    schedule: &PollingSchedule,
    write: bool,
) -> Result<LifecycleReport> {
    let mut board = load_board(matches)?;
    let updates = board.evaluate_all(now, schedule)?;

    let report = LifecycleReport {
        evaluated_at: now.to_rfc3339(),
        matches: updates
            .iter()
            .map(|u| MatchReport {
                match_number: u.match_number,
                previous: u.evaluation.previous,
                status: u.evaluation.status,
                needs_recompute: u.evaluation.needs_recompute(),
                next_check_seconds: u.evaluation.next_check.as_seconds(),
                next_check_at: u.evaluation.next_check.due_at(now).map(|t| t.to_rfc3339()),
            })
            .collect(),
    };

    if write {
        let mut advanced = 0;
        for (descriptor, update) in board.matches.iter_mut().zip(&updates) {
            if descriptor.apply(update) {
                advanced += 1;
            }
        }
        write_output(Some(matches), &board.to_json_pretty()?)?;
        info!(advanced, path = %matches.display(), "Match state saved");
    }
    Ok(report)
}
