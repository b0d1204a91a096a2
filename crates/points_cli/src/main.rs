//! Fantasy Points CLI
//!
//! Scorecard JSON → fantasy points, and match state file → lifecycle pass.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "fantasy-points")]
#[command(about = "Score cricket scorecards and track match lifecycle", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Score a scraped scorecard
    Score {
        /// Scorecard JSON (team name → averages and player stats)
        #[arg(long)]
        scorecard: PathBuf,

        /// Player roster with roles (JSON or YAML)
        #[arg(long)]
        players: PathBuf,

        /// Rule set file; defaults to the FANTASY_RULESET_PROFILE preset
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Output JSON file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Evaluate every tracked match and report which ones need a recompute
    Lifecycle {
        /// Match state file (JSON)
        #[arg(long)]
        matches: PathBuf,

        /// Evaluation instant, RFC 3339 (defaults to now)
        #[arg(long)]
        now: Option<String>,

        /// Polling schedule override (JSON or YAML)
        #[arg(long)]
        schedule: Option<PathBuf>,

        /// Persist advanced statuses back to the state file
        #[arg(long, default_value = "false")]
        write: bool,
    },

    /// Print the JSON Schema of the rule set document
    Schema {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Validate a rule set file without scoring anything
    CheckRules {
        /// Rule set file (JSON or YAML)
        #[arg(long)]
        rules: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    points_cli::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Score { scorecard, players, rules, out } => {
            let response = points_cli::run_score(rules.as_deref(), &players, &scorecard, out.as_deref())?;
            for (team, scores) in &response.teams {
                eprintln!("{team}: {:.1} points across {} players", scores.total, scores.players.len());
            }
            if let Some(out) = out {
                eprintln!("Scores written to: {}", out.display());
            }
        }

        Commands::Lifecycle { matches, now, schedule, write } => {
            let now = points_cli::parse_now(now.as_deref())?;
            let schedule = points_cli::load_schedule(schedule.as_deref())?;
            let report = points_cli::run_lifecycle(&matches, now, &schedule, write)?;
            points_cli::write_output(None, &serde_json::to_string_pretty(&report)?)?;
        }

        Commands::Schema { out } => {
            let schema = fantasy_core::rules::rule_set_schema()?;
            points_cli::write_output(out.as_deref(), &schema)?;
        }

        Commands::CheckRules { rules } => {
            let rule_set = points_cli::load_rule_set(Some(&rules))?;
            let policy = match rule_set.multipliers().policy() {
                Some(policy) => format!("{policy:?}"),
                None => "no role multipliers".to_string(),
            };
            eprintln!("Rule set `{}` is valid ({policy})", rule_set.name());
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("fantasy-points CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
