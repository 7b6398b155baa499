//! Wire protocol between the runner and the engine proxy
//!
//! Messages are serialized as JSON with internally-tagged enums.
//! Format: {"Type": "MessageType", ...fields}
//!
//! Every request gets exactly one response frame carrying the engine status
//! after the request was handled.

use sc2_core::{
    CreateGameError, GameData, GameInfo, Observation, PlayerId, PlayerSetup, Portconfig, Race,
    Status,
};
use serde::{Deserialize, Serialize};

/// Requests sent from the runner to the engine
///
/// Note: `rename_all` on enums only affects variant names, not field names inside variants.
/// Each field must be explicitly renamed using `#[serde(rename = "...")]` for PascalCase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "Type", rename_all = "PascalCase")]
pub enum EngineRequest {
    Ping,

    /// Host a new game
    CreateGame {
        #[serde(rename = "MapPath")]
        map_path: String,
        #[serde(rename = "Players")]
        players: Vec<PlayerSetup>,
        #[serde(rename = "Realtime")]
        realtime: bool,
    },

    /// Join the hosted game (or the local one for single-connection games)
    JoinGame {
        #[serde(rename = "Race")]
        race: Race,
        #[serde(rename = "Ports", skip_serializing_if = "Option::is_none", default)]
        ports: Option<Portconfig>,
    },

    RestartGame,

    Observation,

    /// Advance the simulation
    Step {
        #[serde(rename = "Count")]
        count: u32,
    },

    GameData,

    GameInfo,

    SaveReplay {
        #[serde(rename = "Path")]
        path: String,
    },

    LeaveGame,

    Quit,
}

/// Responses sent from the engine to the runner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "Type", rename_all = "PascalCase")]
pub enum EngineResponse {
    Pong {
        #[serde(rename = "GameVersion", default)]
        game_version: String,
    },

    CreateGame {
        #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
        error: Option<CreateGameError>,
        #[serde(rename = "ErrorDetails", default, skip_serializing_if = "Option::is_none")]
        error_details: Option<String>,
    },

    JoinGame {
        #[serde(rename = "PlayerId")]
        player_id: PlayerId,
    },

    RestartGame,

    Observation {
        #[serde(rename = "Observation")]
        observation: Observation,
    },

    Step,

    GameData {
        #[serde(rename = "Data")]
        data: GameData,
    },

    GameInfo {
        #[serde(rename = "Info")]
        info: GameInfo,
    },

    SaveReplay,

    LeaveGame,

    Quit,

    /// The engine could not handle the request
    Error {
        #[serde(rename = "Message")]
        message: String,
    },
}

/// One response with the engine status that followed it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseFrame {
    #[serde(default)]
    pub status: Status,
    pub response: EngineResponse,
}

/// Serialize a request to JSON bytes
pub fn serialize(msg: &EngineRequest) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(msg)
}

/// Deserialize a response frame from JSON bytes
pub fn deserialize(bytes: &[u8]) -> Result<ResponseFrame, serde_json::Error> {
    serde_json::from_slice(bytes)
}
