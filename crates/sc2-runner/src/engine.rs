//! Engine collaborator traits
//!
//! Implement these to plug a transport into the match runner. The runner never
//! touches the wire; it only sequences these calls.

use async_trait::async_trait;
use sc2_core::{
    CreateGameError, GameData, GameInfo, GameResults, MapSettings, Observation, PlayerId,
    PlayerSetup, Portconfig, Race, Result,
};
use std::path::Path;

/// Engine answer to a create-game request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateGameResponse {
    pub error: Option<CreateGameError>,
    pub error_details: Option<String>,
}

impl CreateGameResponse {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failed(error: CreateGameError, details: Option<String>) -> Self {
        Self {
            error: Some(error),
            error_details: details,
        }
    }
}

/// Starts engine processes; called once per participant connection
#[async_trait]
pub trait Launcher: Send + Sync {
    type Server: Server;

    /// Spawn (or attach to) an engine and return its control handle
    async fn launch(&self) -> Result<Self::Server>;
}

/// Control handle of one running engine process
#[async_trait]
pub trait Server: Send {
    type Client: Client + 'static;

    /// Check the engine is responsive
    async fn ping(&mut self) -> Result<()>;

    /// Ask the engine to host a new game
    async fn create_game(
        &mut self,
        map: &MapSettings,
        players: &[PlayerSetup],
        realtime: bool,
    ) -> Result<CreateGameResponse>;

    /// Restart the running game in place (reset mode)
    async fn restart_game(&mut self) -> Result<()>;

    /// Game client sharing this engine's connection
    fn client(&mut self) -> Result<Self::Client>;

    /// Stop the engine process
    async fn shutdown(&mut self) -> Result<()>;
}

/// In-game connection of one participant
#[async_trait]
pub trait Client: Send {
    /// Join the game; `portconfig` is required for multiplayer games
    async fn join_game(&mut self, race: Race, portconfig: Option<&Portconfig>) -> Result<PlayerId>;

    /// Fetch the current observation; records the game result once the game is over
    async fn observation(&mut self) -> Result<Observation>;

    /// Advance the engine by the configured game step
    async fn step(&mut self) -> Result<()>;

    async fn game_data(&mut self) -> Result<GameData>;

    async fn game_info(&mut self) -> Result<GameInfo>;

    async fn save_replay(&mut self, path: &Path) -> Result<()>;

    async fn leave(&mut self) -> Result<()>;

    async fn quit(&mut self) -> Result<()>;

    /// Whether the engine still reports this client as in a game
    fn in_game(&self) -> bool;

    /// Results reported by the engine for the current episode
    fn game_result(&self) -> Option<&GameResults>;

    /// Forget the recorded results after a restart
    fn clear_game_result(&mut self);

    /// Game loops advanced per `step` call
    fn set_game_step(&mut self, game_step: u32);
}
