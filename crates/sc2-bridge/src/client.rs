//! In-game client over a shared engine connection

use async_trait::async_trait;
use sc2_core::{
    GameData, GameInfo, GameResults, MatchResult, Observation, PlayerId, Portconfig, Race,
    Result, Sc2Error, Status,
};
use sc2_runner::Client;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::protocol::{EngineRequest, EngineResponse};
use crate::transport::{EngineConnection, unexpected};

/// Game client sharing its engine connection with the owning server handle
#[derive(Debug)]
pub struct BridgeClient {
    conn: Arc<Mutex<EngineConnection>>,
    status: Status,
    player_id: Option<PlayerId>,
    game_result: Option<GameResults>,
    game_step: u32,
}

impl BridgeClient {
    pub fn new(conn: Arc<Mutex<EngineConnection>>) -> Self {
        Self {
            conn,
            status: Status::Launched,
            player_id: None,
            game_result: None,
            game_step: 8,
        }
    }

    /// Player id assigned when joining
    pub fn player_id(&self) -> Option<PlayerId> {
        self.player_id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    async fn request(&mut self, request: EngineRequest) -> Result<EngineResponse> {
        let mut conn = self.conn.lock().await;
        let response = conn.request(&request).await;
        self.status = conn.status();
        response
    }

    /// Send a request whose only valid answer is a bare ack
    async fn ack(&mut self, request: EngineRequest, expected: EngineResponse) -> Result<()> {
        match self.request(request).await? {
            response if response == expected => Ok(()),
            other => Err(unexpected(&format!("{:?}", expected), other)),
        }
    }
}

#[async_trait]
impl Client for BridgeClient {
    async fn join_game(&mut self, race: Race, portconfig: Option<&Portconfig>) -> Result<PlayerId> {
        let request = EngineRequest::JoinGame {
            race,
            ports: portconfig.cloned(),
        };
        match self.request(request).await? {
            EngineResponse::JoinGame { player_id } => {
                debug!("Joined game as player {} ({:?})", player_id, race);
                self.player_id = Some(player_id);
                Ok(player_id)
            }
            other => Err(unexpected("JoinGame", other)),
        }
    }

    async fn observation(&mut self) -> Result<Observation> {
        match self.request(EngineRequest::Observation).await? {
            EngineResponse::Observation { observation } => {
                if let Some(results) = observation.game_results() {
                    debug!("Game ended: {:?}", results);
                    self.game_result = Some(results);
                }
                Ok(observation)
            }
            other => Err(unexpected("Observation", other)),
        }
    }

    async fn step(&mut self) -> Result<()> {
        let count = self.game_step;
        self.ack(EngineRequest::Step { count }, EngineResponse::Step)
            .await
    }

    async fn game_data(&mut self) -> Result<GameData> {
        match self.request(EngineRequest::GameData).await? {
            EngineResponse::GameData { data } => Ok(data),
            other => Err(unexpected("GameData", other)),
        }
    }

    async fn game_info(&mut self) -> Result<GameInfo> {
        match self.request(EngineRequest::GameInfo).await? {
            EngineResponse::GameInfo { info } => Ok(info),
            other => Err(unexpected("GameInfo", other)),
        }
    }

    async fn save_replay(&mut self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let path = path
            .to_str()
            .ok_or_else(|| Sc2Error::InvalidConfig(format!("Non UTF-8 replay path: {:?}", path)))?
            .to_string();
        info!("Saving replay to {}", path);
        self.ack(EngineRequest::SaveReplay { path }, EngineResponse::SaveReplay)
            .await
    }

    async fn leave(&mut self) -> Result<()> {
        self.ack(EngineRequest::LeaveGame, EngineResponse::LeaveGame)
            .await?;
        // Leaving before the engine decided the game is a resignation
        if let (None, Some(player_id)) = (&self.game_result, self.player_id) {
            self.game_result = Some(GameResults::from([(player_id, MatchResult::Defeat)]));
        }
        Ok(())
    }

    async fn quit(&mut self) -> Result<()> {
        self.ack(EngineRequest::Quit, EngineResponse::Quit).await
    }

    fn in_game(&self) -> bool {
        self.status == Status::InGame
    }

    fn game_result(&self) -> Option<&GameResults> {
        self.game_result.as_ref()
    }

    fn clear_game_result(&mut self) {
        self.game_result = None;
    }

    fn set_game_step(&mut self, game_step: u32) {
        self.game_step = game_step;
    }
}
