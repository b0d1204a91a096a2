use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{PlayerId, RegistryError, ScoringError};

/// Fantasy role a player is registered under for the tournament.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum PlayerRole {
    #[serde(alias = "Batsman", alias = "BAT")]
    Batter,
    #[serde(alias = "BOWL")]
    Bowler,
    #[serde(alias = "All-rounder", alias = "AllRounder", alias = "AR")]
    Allrounder,
    #[serde(alias = "Wicketkeeper", alias = "WicketKeeper", alias = "WK")]
    Keeper,
}

impl PlayerRole {
    pub const ALL: [PlayerRole; 4] =
        [PlayerRole::Batter, PlayerRole::Bowler, PlayerRole::Allrounder, PlayerRole::Keeper];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerRole::Batter => "Batter",
            PlayerRole::Bowler => "Bowler",
            PlayerRole::Allrounder => "Allrounder",
            PlayerRole::Keeper => "Keeper",
        }
    }
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerRole {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String =
            s.trim().chars().filter(|c| c.is_alphanumeric()).collect::<String>().to_lowercase();
        match normalized.as_str() {
            "batter" | "batsman" | "bat" => Ok(PlayerRole::Batter),
            "bowler" | "bowl" => Ok(PlayerRole::Bowler),
            "allrounder" | "ar" => Ok(PlayerRole::Allrounder),
            "keeper" | "wicketkeeper" | "wk" => Ok(PlayerRole::Keeper),
            _ => Err(RegistryError::UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlayersDocument {
    players: Vec<PlayerEntry>,
}

#[derive(Debug, Deserialize)]
struct PlayerEntry {
    name: String,
    role: String,
}

/// Mapping from player identifier to fantasy role, maintained outside the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleRegistry {
    roles: HashMap<PlayerId, PlayerRole>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `{ "players": [{ "name": .., "role": .. }] }` document.
    pub fn from_players_json(json: &str) -> Result<Self, RegistryError> {
        let doc: PlayersDocument =
            serde_json::from_str(json).map_err(|e| RegistryError::Parse(e.to_string()))?;
        Self::from_entries(doc.players)
    }

    /// YAML flavour of [`RoleRegistry::from_players_json`].
    pub fn from_players_yaml(yaml: &str) -> Result<Self, RegistryError> {
        let doc: PlayersDocument =
            serde_yaml::from_str(yaml).map_err(|e| RegistryError::Parse(e.to_string()))?;
        Self::from_entries(doc.players)
    }

    fn from_entries(entries: Vec<PlayerEntry>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for entry in entries {
            let role = entry.role.parse::<PlayerRole>()?;
            registry.insert(entry.name, role)?;
        }
        Ok(registry)
    }

    /// Register a player. Re-registering with the same role is a no-op.
    pub fn insert(&mut self, player: impl Into<PlayerId>, role: PlayerRole) -> Result<(), RegistryError> {
        let player = player.into();
        match self.roles.get(&player) {
            Some(existing) if *existing != role => Err(RegistryError::ConflictingRole { player }),
            _ => {
                self.roles.insert(player, role);
                Ok(())
            }
        }
    }

    pub fn role_of(&self, player: &str) -> Option<PlayerRole> {
        self.roles.get(player).copied()
    }

    /// Look up a role, failing with the player id when it is not registered.
    pub fn require(&self, player: &str) -> Result<PlayerRole, ScoringError> {
        self.role_of(player)
            .ok_or_else(|| ScoringError::UnknownPlayerRole { player: player.to_string() })
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, PlayerRole)> {
        self.roles.iter().map(|(name, role)| (name.as_str(), *role))
    }
}

impl FromIterator<(PlayerId, PlayerRole)> for RoleRegistry {
    /// Later entries win on conflict; use [`RoleRegistry::insert`] to detect conflicts.
    fn from_iter<I: IntoIterator<Item = (PlayerId, PlayerRole)>>(iter: I) -> Self {
        Self { roles: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_accepts_common_spellings() {
        assert_eq!("Batsman".parse::<PlayerRole>().unwrap(), PlayerRole::Batter);
        assert_eq!("all-rounder".parse::<PlayerRole>().unwrap(), PlayerRole::Allrounder);
        assert_eq!("WK".parse::<PlayerRole>().unwrap(), PlayerRole::Keeper);
        assert_eq!(" Bowler ".parse::<PlayerRole>().unwrap(), PlayerRole::Bowler);
        assert!(matches!("Umpire".parse::<PlayerRole>(), Err(RegistryError::UnknownRole(_))));
    }

    #[test]
    fn test_role_serde_aliases() {
        let role: PlayerRole = serde_json::from_str("\"Wicketkeeper\"").unwrap();
        assert_eq!(role, PlayerRole::Keeper);
        assert_eq!(serde_json::to_string(&PlayerRole::Allrounder).unwrap(), "\"Allrounder\"");
    }

    #[test]
    fn test_registry_from_players_json() {
        let json = r#"{
            "players": [
                { "name": "Virat Kohli", "role": "Batter" },
                { "name": "Jasprit Bumrah", "role": "Bowler" },
                { "name": "Hardik Pandya", "role": "Allrounder" },
                { "name": "MS Dhoni", "role": "Wicketkeeper" }
            ]
        }"#;
        let registry = RoleRegistry::from_players_json(json).unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.role_of("MS Dhoni"), Some(PlayerRole::Keeper));
        assert_eq!(registry.require("Hardik Pandya").unwrap(), PlayerRole::Allrounder);
    }

    #[test]
    fn test_registry_from_players_yaml() {
        let yaml = "players:\n  - name: Rashid Khan\n    role: Bowler\n";
        let registry = RoleRegistry::from_players_yaml(yaml).unwrap();
        assert_eq!(registry.role_of("Rashid Khan"), Some(PlayerRole::Bowler));
    }

    #[test]
    fn test_registry_rejects_conflicting_roles() {
        let json = r#"{ "players": [
            { "name": "Axar Patel", "role": "Bowler" },
            { "name": "Axar Patel", "role": "Allrounder" }
        ] }"#;
        let err = RoleRegistry::from_players_json(json).unwrap_err();
        assert_eq!(err, RegistryError::ConflictingRole { player: "Axar Patel".to_string() });
    }

    #[test]
    fn test_unknown_player_is_typed_failure() {
        let registry = RoleRegistry::new();
        let err = registry.require("Nobody").unwrap_err();
        assert_eq!(err, ScoringError::UnknownPlayerRole { player: "Nobody".to_string() });
    }
}
