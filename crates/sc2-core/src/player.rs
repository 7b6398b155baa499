//! Player slot setup sent to the engine when creating a game

use serde::{Deserialize, Serialize};

use crate::result::{AiBuild, Difficulty, Race};

/// Engine-assigned player id
pub type PlayerId = u32;

/// Kind of a slot in the create-game request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum PlayerKind {
    /// Controlled through an API connection (human or bot)
    Participant,
    /// Engine built-in AI
    Computer,
    Observer,
}

/// One slot of the create-game request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerSetup {
    pub kind: PlayerKind,
    pub race: Race,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_build: Option<AiBuild>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PlayerSetup {
    /// API-controlled slot
    pub fn participant(race: Race) -> Self {
        Self {
            kind: PlayerKind::Participant,
            race,
            difficulty: None,
            ai_build: None,
            name: None,
        }
    }

    /// Built-in computer slot
    pub fn computer(race: Race, difficulty: Difficulty, ai_build: AiBuild) -> Self {
        Self {
            kind: PlayerKind::Computer,
            race,
            difficulty: Some(difficulty),
            ai_build: Some(ai_build),
            name: None,
        }
    }

    /// Attach a display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether this slot needs its own API connection
    pub fn is_controlled(&self) -> bool {
        self.kind == PlayerKind::Participant
    }
}
