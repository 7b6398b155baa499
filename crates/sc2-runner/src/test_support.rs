//! Scripted in-memory engine and bot used by the runner tests

use async_trait::async_trait;
use sc2_core::{
    Alliance, DisplayType, GameData, GameInfo, GameResults, GameState, MapSettings, MatchResult,
    Observation, PlayerId, PlayerResult, PlayerSetup, Portconfig, Race, Result, Sc2Error, Unit,
};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::ai::Ai;
use crate::engine::{Client, CreateGameResponse, Launcher, Server};

/// How an episode ends, counted in engine advances since the episode began
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ending {
    Never,
    Engine { after: u64, result: MatchResult },
    EnemiesGone { after: u64 },
    UnitsGone { after: u64 },
}

impl Ending {
    pub fn engine(after: u64, result: MatchResult) -> Self {
        Ending::Engine { after, result }
    }
}

/// Calls the engine received
#[derive(Debug, Clone, Default)]
pub struct EngineLog {
    pub launches: u32,
    pub pings: u32,
    pub creates: Vec<Vec<PlayerSetup>>,
    pub restarts: u32,
    pub joins: Vec<(Race, Option<Portconfig>)>,
    pub observations: u32,
    pub steps: u64,
    pub replays: Vec<PathBuf>,
    pub leaves: u32,
    pub quits: u32,
    pub shutdowns: u32,
}

#[derive(Debug)]
struct EngineState {
    log: EngineLog,
    script: Vec<Ending>,
    player_id: PlayerId,
    realtime: bool,
    start_loop: u64,
    game_loop: u64,
    game_step: u32,
    /// Advances since the current episode began
    ticks: u64,
    in_game: bool,
    create_error: Option<CreateGameResponse>,
    close_after_steps: Option<u64>,
    close_on_leave: bool,
}

impl EngineState {
    fn episode(&self) -> usize {
        (self.log.creates.len().saturating_sub(1)) + self.log.restarts as usize
    }

    fn ending(&self) -> Ending {
        self.script
            .get(self.episode())
            .copied()
            .unwrap_or(Ending::Never)
    }

    fn advance(&mut self) {
        self.ticks += 1;
        self.game_loop += u64::from(self.game_step);
    }

    fn new_episode(&mut self) {
        self.ticks = 0;
        self.game_loop = self.start_loop;
        self.in_game = true;
    }

    fn observe(&mut self) -> Observation {
        self.log.observations += 1;
        let ticks = self.ticks;
        let mut own = true;
        let mut enemy = true;
        let mut player_result = vec![];
        match self.ending() {
            Ending::Never => {}
            Ending::Engine { after, result } if ticks >= after => {
                player_result.push(PlayerResult {
                    player_id: self.player_id,
                    result,
                });
            }
            Ending::EnemiesGone { after } if ticks >= after => enemy = false,
            Ending::UnitsGone { after } if ticks >= after => own = false,
            _ => {}
        }

        let mut units = vec![unit(1, Alliance::Neutral)];
        if own {
            units.push(unit(2, Alliance::Own));
        }
        if enemy {
            units.push(unit(3, Alliance::Enemy));
        }
        let observation = Observation {
            game_loop: self.game_loop,
            units,
            player_result,
        };

        if self.realtime {
            self.advance();
        }
        observation
    }
}

fn unit(tag: u64, alliance: Alliance) -> Unit {
    Unit {
        tag,
        unit_type: 48,
        alliance,
        display_type: DisplayType::Visible,
        owner: 0,
        position: [10.0, 10.0],
        health: 45.0,
    }
}

/// Handle to one scripted engine process
#[derive(Debug, Clone)]
pub struct FakeEngine(Arc<Mutex<EngineState>>);

impl FakeEngine {
    /// One ending per episode; episodes past the script never end
    pub fn scripted(script: Vec<Ending>) -> Self {
        Self(Arc::new(Mutex::new(EngineState {
            log: EngineLog::default(),
            script,
            player_id: 1,
            realtime: false,
            start_loop: 0,
            game_loop: 0,
            game_step: 8,
            ticks: 0,
            in_game: false,
            create_error: None,
            close_after_steps: None,
            close_on_leave: false,
        })))
    }

    fn with<T>(&self, f: impl FnOnce(&mut EngineState) -> T) -> T {
        f(&mut self.0.lock().unwrap())
    }

    pub fn log(&self) -> EngineLog {
        self.with(|s| s.log.clone())
    }

    pub fn set_game_loop(&self, game_loop: u64) {
        self.with(|s| {
            s.start_loop = game_loop;
            s.game_loop = game_loop;
        });
    }

    pub fn set_realtime(&self, realtime: bool) {
        self.with(|s| s.realtime = realtime);
    }

    pub fn set_player_id(&self, player_id: PlayerId) {
        self.with(|s| s.player_id = player_id);
    }

    pub fn fail_create(&self, response: CreateGameResponse) {
        self.with(|s| s.create_error = Some(response));
    }

    pub fn close_after_steps(&self, steps: u64) {
        self.with(|s| s.close_after_steps = Some(steps));
    }

    pub fn close_on_leave(&self) {
        self.with(|s| s.close_on_leave = true);
    }

    pub fn server(&self) -> FakeServer {
        FakeServer(self.clone())
    }

    pub fn client(&self) -> FakeClient {
        self.with(|s| s.in_game = true);
        FakeClient {
            engine: self.clone(),
            game_result: None,
        }
    }
}

/// Hands out pre-built engines, one per launch
pub struct FakeLauncher {
    engines: Mutex<VecDeque<FakeEngine>>,
}

impl FakeLauncher {
    pub fn new(engines: Vec<FakeEngine>) -> Self {
        Self {
            engines: Mutex::new(engines.into()),
        }
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    type Server = FakeServer;

    async fn launch(&self) -> Result<FakeServer> {
        let engine = self
            .engines
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Sc2Error::Process("No engine left to launch".into()))?;
        engine.with(|s| s.log.launches += 1);
        Ok(engine.server())
    }
}

pub struct FakeServer(FakeEngine);

#[async_trait]
impl Server for FakeServer {
    type Client = FakeClient;

    async fn ping(&mut self) -> Result<()> {
        self.0.with(|s| s.log.pings += 1);
        Ok(())
    }

    async fn create_game(
        &mut self,
        _map: &MapSettings,
        players: &[PlayerSetup],
        realtime: bool,
    ) -> Result<CreateGameResponse> {
        self.0.with(|s| {
            s.log.creates.push(players.to_vec());
            s.realtime = realtime;
            s.new_episode();
            Ok(s.create_error.clone().unwrap_or_default())
        })
    }

    async fn restart_game(&mut self) -> Result<()> {
        self.0.with(|s| {
            s.log.restarts += 1;
            s.new_episode();
        });
        Ok(())
    }

    fn client(&mut self) -> Result<FakeClient> {
        Ok(self.0.client())
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.0.with(|s| s.log.shutdowns += 1);
        Ok(())
    }
}

pub struct FakeClient {
    engine: FakeEngine,
    game_result: Option<GameResults>,
}

#[async_trait]
impl Client for FakeClient {
    async fn join_game(&mut self, race: Race, portconfig: Option<&Portconfig>) -> Result<PlayerId> {
        Ok(self.engine.with(|s| {
            s.log.joins.push((race, portconfig.cloned()));
            s.in_game = true;
            s.player_id
        }))
    }

    async fn observation(&mut self) -> Result<Observation> {
        let observation = self.engine.with(|s| s.observe());
        if let Some(results) = observation.game_results() {
            self.game_result = Some(results);
        }
        Ok(observation)
    }

    async fn step(&mut self) -> Result<()> {
        self.engine.with(|s| {
            if s.close_after_steps.is_some_and(|n| s.log.steps >= n) {
                return Err(Sc2Error::ConnectionClosed);
            }
            s.log.steps += 1;
            s.advance();
            Ok(())
        })
    }

    async fn game_data(&mut self) -> Result<GameData> {
        Ok(GameData::default())
    }

    async fn game_info(&mut self) -> Result<GameInfo> {
        Ok(GameInfo {
            map_name: "Flat64".into(),
            ..Default::default()
        })
    }

    async fn save_replay(&mut self, path: &Path) -> Result<()> {
        self.engine.with(|s| s.log.replays.push(path.to_path_buf()));
        Ok(())
    }

    async fn leave(&mut self) -> Result<()> {
        let player_id = self.engine.with(|s| {
            s.log.leaves += 1;
            s.in_game = false;
            if s.close_on_leave {
                return Err(Sc2Error::ConnectionClosed);
            }
            Ok(s.player_id)
        })?;
        // Leaving before the game ended is a resignation
        if self.game_result.is_none() {
            self.game_result = Some(HashMap::from([(player_id, MatchResult::Defeat)]));
        }
        Ok(())
    }

    async fn quit(&mut self) -> Result<()> {
        self.engine.with(|s| s.log.quits += 1);
        Ok(())
    }

    fn in_game(&self) -> bool {
        self.engine.with(|s| s.in_game)
    }

    fn game_result(&self) -> Option<&GameResults> {
        self.game_result.as_ref()
    }

    fn clear_game_result(&mut self) {
        self.game_result = None;
    }

    fn set_game_step(&mut self, game_step: u32) {
        self.engine.with(|s| s.game_step = game_step);
    }
}

/// What the bot was asked to do
#[derive(Debug, Clone, Default)]
pub struct AiLog {
    pub player_id: Option<PlayerId>,
    pub starts: u32,
    pub resets: Vec<Option<MatchResult>>,
    pub prepared_steps: u32,
    pub first_steps: u32,
    pub events_issued: u32,
    /// Iterations `on_step` was entered with
    pub steps: Vec<u64>,
    /// Iterations `on_step` ran to completion for
    pub completed_steps: Vec<u64>,
    pub ends: Vec<MatchResult>,
}

#[derive(Debug, Clone, Default)]
pub struct AiScript {
    pub fail_on: Option<u64>,
    pub resign_on: Option<u64>,
    pub slow_on: Vec<u64>,
    pub slow_for: Duration,
}

/// Bot that records every hook call
#[derive(Default)]
pub struct FakeAi {
    script: AiScript,
    log: Arc<Mutex<AiLog>>,
    state: Option<GameState>,
}

impl FakeAi {
    pub fn new(script: AiScript) -> Self {
        Self {
            script,
            ..Default::default()
        }
    }

    /// Shared view of the log, usable after the bot moved into a participant
    pub fn log_handle(&self) -> Arc<Mutex<AiLog>> {
        self.log.clone()
    }

    pub fn log(&self) -> AiLog {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, f: impl FnOnce(&mut AiLog)) {
        f(&mut self.log.lock().unwrap());
    }
}

#[async_trait]
impl Ai for FakeAi {
    fn prepare_start(&mut self, player_id: PlayerId, _game_info: &GameInfo, _game_data: &GameData) {
        self.record(|l| l.player_id = Some(player_id));
    }

    fn on_start(&mut self) {
        self.record(|l| l.starts += 1);
    }

    fn on_reset(&mut self, previous: Option<MatchResult>) {
        self.record(|l| l.resets.push(previous));
    }

    fn prepare_step(&mut self, state: GameState) {
        self.record(|l| l.prepared_steps += 1);
        self.state = Some(state);
    }

    fn prepare_first_step(&mut self) {
        self.record(|l| l.first_steps += 1);
    }

    fn units(&self) -> &[Unit] {
        self.state.as_ref().map(|s| s.units.as_slice()).unwrap_or(&[])
    }

    fn known_enemy_units(&self) -> &[Unit] {
        self.state
            .as_ref()
            .map(|s| s.enemy_units.as_slice())
            .unwrap_or(&[])
    }

    async fn issue_events(&mut self, _client: &mut dyn Client) -> anyhow::Result<()> {
        self.record(|l| l.events_issued += 1);
        Ok(())
    }

    async fn on_step(&mut self, iteration: u64, client: &mut dyn Client) -> anyhow::Result<()> {
        self.record(|l| l.steps.push(iteration));

        if self.script.fail_on == Some(iteration) {
            anyhow::bail!("unit lookup failed on iteration {}", iteration);
        }
        if self.script.resign_on == Some(iteration) {
            client.leave().await?;
        }
        if self.script.slow_on.contains(&iteration) {
            tokio::time::sleep(self.script.slow_for).await;
        }

        self.record(|l| l.completed_steps.push(iteration));
        Ok(())
    }

    fn on_end(&mut self, result: MatchResult) {
        self.record(|l| l.ends.push(result));
    }
}
