//! Raw engine observation types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::player::PlayerId;
use crate::result::{MatchResult, Race};

/// Engine connection status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Launched,
    InitGame,
    InGame,
    InReplay,
    Ended,
    Quit,
    Unknown,
}

/// Relationship of a unit to the observing player
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum Alliance {
    #[serde(rename = "Self")]
    Own,
    Ally,
    Neutral,
    Enemy,
}

/// How the unit is currently seen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub enum DisplayType {
    #[default]
    Visible,
    /// Last-known position under fog of war
    Snapshot,
    Hidden,
}

/// A unit in the raw observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Unit {
    pub tag: u64,
    pub unit_type: u32,
    pub alliance: Alliance,
    #[serde(default)]
    pub display_type: DisplayType,
    #[serde(default)]
    pub owner: u32,
    #[serde(default)]
    pub position: [f32; 2],
    #[serde(default)]
    pub health: f32,
}

/// Final result for one player as reported by the engine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerResult {
    pub player_id: PlayerId,
    pub result: MatchResult,
}

/// Raw observation returned by the engine for one game loop
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Observation {
    pub game_loop: u64,
    #[serde(default)]
    pub units: Vec<Unit>,
    /// Populated only once the game is over
    #[serde(default)]
    pub player_result: Vec<PlayerResult>,
}

/// Static unit type data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct UnitTypeData {
    pub unit_id: u32,
    pub name: String,
}

/// Static game data, fetched once per game
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct GameData {
    #[serde(default)]
    pub units: HashMap<u32, UnitTypeData>,
}

impl GameData {
    /// Name of a unit type, if known
    pub fn unit_name(&self, unit_type: u32) -> Option<&str> {
        self.units.get(&unit_type).map(|d| d.name.as_str())
    }
}

/// Static per-game map and player info
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct GameInfo {
    pub map_name: String,
    #[serde(default)]
    pub map_size: [u32; 2],
    #[serde(default)]
    pub player_races: HashMap<PlayerId, Race>,
}

/// Engine-reported results keyed by player id
pub type GameResults = HashMap<PlayerId, MatchResult>;

impl Observation {
    /// Engine results carried by this observation, if the game is over
    pub fn game_results(&self) -> Option<GameResults> {
        if self.player_result.is_empty() {
            return None;
        }
        Some(
            self.player_result
                .iter()
                .map(|r| (r.player_id, r.result))
                .collect(),
        )
    }
}
