//! Built-in rule sets embedded at compile time.

use std::sync::OnceLock;

use super::ScoringRuleSet;

/// Standard preset YAML (compile-time embedded).
pub const STANDARD_RULESET_YAML: &str = include_str!("../../data/rulesets/standard.yaml");

/// Flat preset YAML (compile-time embedded).
pub const FLAT_RULESET_YAML: &str = include_str!("../../data/rulesets/flat.yaml");

static STANDARD_RULES: OnceLock<ScoringRuleSet> = OnceLock::new();
static FLAT_RULES: OnceLock<ScoringRuleSet> = OnceLock::new();

/// Standard preset, parsed on first use and cached.
///
/// # Panics
///
/// Panics if the embedded YAML fails validation, which a passing test suite rules out.
pub fn standard_rules() -> &'static ScoringRuleSet {
    STANDARD_RULES.get_or_init(|| {
        ScoringRuleSet::from_yaml_str(STANDARD_RULESET_YAML)
            .expect("Failed to load embedded standard.yaml")
    })
}

/// Flat preset, parsed on first use and cached.
///
/// # Panics
///
/// Panics if the embedded YAML fails validation.
pub fn flat_rules() -> &'static ScoringRuleSet {
    FLAT_RULES.get_or_init(|| {
        ScoringRuleSet::from_yaml_str(FLAT_RULESET_YAML).expect("Failed to load embedded flat.yaml")
    })
}
