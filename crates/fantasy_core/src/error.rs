use thiserror::Error;

/// Player identifier as it appears in scorecards and the role registry.
pub type PlayerId = String;

/// Failure while scoring a single player's record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Invalid performance data for {player}: {reason}")]
    InvalidPerformanceData { player: PlayerId, reason: String },

    #[error("Missing rule definition `{rule}` needed to score {player}")]
    MissingRuleDefinition { player: PlayerId, rule: String },

    #[error("No role registered for player {player}")]
    UnknownPlayerRole { player: PlayerId },
}

impl ScoringError {
    /// The player whose record triggered the failure.
    pub fn player(&self) -> &str {
        match self {
            ScoringError::InvalidPerformanceData { player, .. }
            | ScoringError::MissingRuleDefinition { player, .. }
            | ScoringError::UnknownPlayerRole { player } => player,
        }
    }

    /// True when the defect lies in the player's own data rather than in
    /// configuration; skipping that player leaves the rest of the match sound.
    pub fn is_record_defect(&self) -> bool {
        match self {
            ScoringError::InvalidPerformanceData { .. } => true,
            ScoringError::UnknownPlayerRole { .. } => true,
            ScoringError::MissingRuleDefinition { .. } => false,
        }
    }

    pub(crate) fn invalid(player: &str, reason: impl Into<String>) -> Self {
        ScoringError::InvalidPerformanceData { player: player.to_string(), reason: reason.into() }
    }

    pub(crate) fn missing_rule(player: &str, rule: &str) -> Self {
        ScoringError::MissingRuleDefinition { player: player.to_string(), rule: rule.to_string() }
    }
}

/// Failure while turning a rule document into a [`crate::rules::ScoringRuleSet`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleSetError {
    #[error("Rule set `{rule_set}` defines role multipliers without declaring an aggregation policy")]
    AmbiguousRoleMultiplierPolicy { rule_set: String },

    #[error("Rule set `{rule_set}` is missing rule definition `{rule}`")]
    MissingRuleDefinition { rule_set: String, rule: String },

    #[error("Rule set `{rule_set}` has invalid rule `{rule}`: {reason}")]
    InvalidRule { rule_set: String, rule: String, reason: String },

    #[error("Rule document parse error: {0}")]
    Parse(String),
}

/// Failure while building a role registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Unknown player role: {0}")]
    UnknownRole(String),

    #[error("Player {player} registered with conflicting roles")]
    ConflictingRole { player: PlayerId },

    #[error("Registry parse error: {0}")]
    Parse(String),
}

/// Failure while evaluating match lifecycle state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    #[error("Match {match_number}: malformed timestamp `{value}` ({reason})")]
    MalformedTimestamp { match_number: u32, value: String, reason: String },

    #[error("Match {match_number} appears more than once in the match board")]
    DuplicateMatch { match_number: u32 },

    #[error("Invalid polling schedule: {0}")]
    InvalidSchedule(String),
}

/// Crate-wide error used by the JSON entry points.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    RuleSet(#[from] RuleSetError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            CoreError::Deserialization(err.to_string())
        } else {
            CoreError::Serialization(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
