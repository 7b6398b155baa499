//! Match outcome, race and game-creation enums

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one episode for one participant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub enum MatchResult {
    Victory,
    Defeat,
    Tie,
    Undecided,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Playable races
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "PascalCase")]
pub enum Race {
    Terran,
    Zerg,
    Protoss,
    #[default]
    Random,
}

/// Built-in computer opponent difficulty
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub enum Difficulty {
    VeryEasy,
    Easy,
    Medium,
    MediumHard,
    #[default]
    Hard,
    Harder,
    VeryHard,
    CheatVision,
    CheatMoney,
    CheatInsane,
}

/// Built-in computer opponent build preference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub enum AiBuild {
    #[default]
    RandomBuild,
    Rush,
    Timing,
    Power,
    Macro,
    Air,
}

/// Reason the engine rejected a create-game request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum CreateGameError {
    MissingMap,
    InvalidMapPath,
    InvalidMapData,
    InvalidMapName,
    InvalidMapHandle,
    MissingPlayerSetup,
    InvalidPlayerSetup,
    MultiplayerUnsupported,
}

impl fmt::Display for CreateGameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
