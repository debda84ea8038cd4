use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Highest level a player can reach
pub const MAX_LEVEL: i32 = 9;

/// Snapshot of one moment of play, as handed over by whatever produced it
/// (manual entry, OCR, telemetry). Every field is optional on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub round: i32,
    pub level: i32,
    pub gold: i32,
    pub health: i32,
    pub stage: String,
    pub current_board: Vec<Unit>,
    pub bench: Vec<String>,
    pub available_shops: Vec<String>,
    pub synergies: BTreeMap<String, u32>,
    /// Scouted enemy boards
    pub opponents: Vec<OpponentBoard>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            round: 0,
            level: 0,
            gold: 0,
            health: 100,
            stage: String::new(),
            current_board: Vec::new(),
            bench: Vec::new(),
            available_shops: Vec::new(),
            synergies: BTreeMap::new(),
            opponents: Vec::new(),
        }
    }
}

/// A unit deployed on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    #[serde(rename = "unit", alias = "name", default)]
    pub name: String,
    #[serde(default = "default_cost")]
    pub cost: u32,
    #[serde(default = "default_stars")]
    pub stars: u32,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Hex>,
}

fn default_cost() -> u32 {
    1
}

fn default_stars() -> u32 {
    1
}

impl Unit {
    pub fn new(name: impl Into<String>, cost: u32, stars: u32) -> Self {
        Self {
            name: name.into(),
            cost,
            stars,
            items: Vec::new(),
            traits: Vec::new(),
            position: None,
        }
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits = traits.into_iter().map(Into::into).collect();
        self
    }
}

/// Hex board coordinate (row, col). Row 0 is the front line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex(pub u8, pub u8);

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// An enemy board seen while scouting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentBoard {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub board: Vec<Unit>,
    /// Composition archetype, e.g. "Assassins" or "AoE"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
}

/// One clause of the validity invariant that a state breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Violation {
    LevelNotPositive,
    NegativeGold,
    Eliminated,
    MissingStage,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Violation::LevelNotPositive => "level must be greater than 0",
            Violation::NegativeGold => "gold must not be negative",
            Violation::Eliminated => "health must be greater than 0",
            Violation::MissingStage => "stage is not set",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("game state is not valid for analysis: {}", join_violations(.0))]
    Invalid(Vec<Violation>),
    #[error("failed to parse game state")]
    Parse(#[from] serde_json::Error),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a state from JSON, filling defaults for any missing field
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a state from an already-parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self, StateError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse a state file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read game state {}", path.display()))?;
        let state = Self::from_json(&content)
            .with_context(|| format!("Failed to parse game state {}", path.display()))?;
        tracing::debug!(
            "Loaded game state: stage={:?} level={} gold={} health={}",
            state.stage,
            state.level,
            state.gold,
            state.health
        );
        Ok(state)
    }

    /// Every clause of the validity invariant this state breaks
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if self.level <= 0 {
            violations.push(Violation::LevelNotPositive);
        }
        if self.gold < 0 {
            violations.push(Violation::NegativeGold);
        }
        if self.health <= 0 {
            violations.push(Violation::Eliminated);
        }
        if self.stage.is_empty() {
            violations.push(Violation::MissingStage);
        }
        violations
    }

    pub fn is_valid(&self) -> bool {
        self.violations().is_empty()
    }

    pub fn validate(&self) -> Result<(), StateError> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(StateError::Invalid(violations))
        }
    }

    /// Leading number of the stage string ("3-2" -> 3). Falls back to 1.
    pub fn stage_major(&self) -> u32 {
        parse_stage_major(&self.stage)
    }

    pub fn synergy_count(&self, name: &str) -> u32 {
        self.synergies.get(name).copied().unwrap_or(0)
    }

    pub fn board_unit_names(&self) -> Vec<String> {
        self.current_board.iter().map(|u| u.name.clone()).collect()
    }

    /// Multi-line summary for terminal display
    pub fn display_text(&self) -> String {
        let mut text = format!("Stage: {}\n", self.stage);
        text.push_str(&format!(
            "Level: {} | Gold: {} | Health: {}\n\n",
            self.level, self.gold, self.health
        ));

        text.push_str("Board:\n");
        for unit in &self.current_board {
            text.push_str(&format!(
                "  {} ({}\u{2605}) - {}\n",
                unit.name,
                unit.stars,
                unit.items.join(", ")
            ));
        }

        text.push_str("\nSynergies:\n");
        for (synergy, count) in &self.synergies {
            text.push_str(&format!("  {}: {}\n", synergy, count));
        }

        text.push_str(&format!("\nShop: {}", self.available_shops.join(", ")));
        text
    }
}

/// Parse the major stage number from a "major-minor" string
pub fn parse_stage_major(stage: &str) -> u32 {
    stage
        .split('-')
        .next()
        .and_then(|major| major.trim().parse::<u32>().ok())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn example_json() -> &'static str {
        r#"{
            "level": 5,
            "gold": 45,
            "health": 75,
            "stage": "3-2",
            "current_board": [
                {"unit": "Ahri", "cost": 4, "stars": 1, "items": ["Blue Buff"]}
            ],
            "synergies": {"Mystic": 2}
        }"#
    }

    #[test]
    fn test_example_state_is_valid() {
        let state = GameState::from_json(example_json()).unwrap();
        assert!(state.is_valid());
        assert_eq!(state.current_board[0].name, "Ahri");
        assert_eq!(state.current_board[0].cost, 4);
        assert_eq!(state.synergy_count("Mystic"), 2);
        assert_eq!(state.synergy_count("Brawler"), 0);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let state = GameState::from_json("{}").unwrap();
        assert_eq!(state.level, 0);
        assert_eq!(state.gold, 0);
        assert_eq!(state.health, 100);
        assert!(state.stage.is_empty());
        assert!(state.current_board.is_empty());
        assert!(!state.is_valid());
    }

    #[test]
    fn test_nameless_units_default_to_empty_name() {
        let state = GameState::from_json(
            r#"{
                "level": 5, "gold": 10, "health": 50, "stage": "3-1",
                "current_board": [{"cost": 3, "stars": 2}],
                "opponents": [{"name": "p2", "board": [{"cost": 4}]}]
            }"#,
        )
        .unwrap();
        assert!(state.is_valid());
        assert_eq!(state.current_board[0].name, "");
        assert_eq!(state.current_board[0].cost, 3);
        assert_eq!(state.current_board[0].stars, 2);
        assert_eq!(state.opponents[0].board[0].name, "");
        assert_eq!(state.opponents[0].board[0].stars, 1);
    }

    #[test]
    fn test_unit_defaults_and_name_alias() {
        let state =
            GameState::from_json(r#"{"current_board": [{"name": "Garen"}]}"#).unwrap();
        let unit = &state.current_board[0];
        assert_eq!(unit.name, "Garen");
        assert_eq!(unit.cost, 1);
        assert_eq!(unit.stars, 1);
        assert!(unit.items.is_empty());
        assert!(unit.position.is_none());
    }

    #[test]
    fn test_hex_position_round_trips_as_array() {
        let state =
            GameState::from_json(r#"{"current_board": [{"unit": "Jinx", "position": [3, 6]}]}"#)
                .unwrap();
        assert_eq!(state.current_board[0].position, Some(Hex(3, 6)));
        let json = serde_json::to_value(&state.current_board[0]).unwrap();
        assert_eq!(json["position"], serde_json::json!([3, 6]));
        assert_eq!(json["unit"], "Jinx");
    }

    #[test]
    fn test_validate_lists_every_violation() {
        let state = GameState {
            level: 0,
            gold: -1,
            health: 0,
            ..GameState::default()
        };
        match state.validate() {
            Err(StateError::Invalid(v)) => assert_eq!(
                v,
                vec![
                    Violation::LevelNotPositive,
                    Violation::NegativeGold,
                    Violation::Eliminated,
                    Violation::MissingStage,
                ]
            ),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let err = GameState::from_json(r#"{"gold": "lots"}"#).unwrap_err();
        assert!(matches!(err, StateError::Parse(_)));
    }

    #[test]
    fn test_stage_major_parsing() {
        assert_eq!(parse_stage_major("3-2"), 3);
        assert_eq!(parse_stage_major("10-1"), 10);
        assert_eq!(parse_stage_major(" 4-5"), 4);
        assert_eq!(parse_stage_major("7"), 7);
        assert_eq!(parse_stage_major(""), 1);
        assert_eq!(parse_stage_major("abc"), 1);
        assert_eq!(parse_stage_major("-2"), 1);
    }

    #[test]
    fn test_display_text() {
        let state = GameState::from_json(example_json()).unwrap();
        let text = state.display_text();
        assert!(text.starts_with("Stage: 3-2\n"));
        assert!(text.contains("Level: 5 | Gold: 45 | Health: 75"));
        assert!(text.contains("Ahri (1\u{2605}) - Blue Buff"));
        assert!(text.contains("Mystic: 2"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(example_json().as_bytes()).unwrap();
        let state = GameState::load(file.path()).unwrap();
        assert_eq!(state.gold, 45);
    }

    #[test]
    fn test_load_nonexistent() {
        assert!(GameState::load(Path::new("/nonexistent/state.json")).is_err());
    }
}
