//! AI step driver: one observe → decide → commit cycle

use sc2_core::{
    GameData, GameResults, GameState, MatchResult, PlayOptions, PlayerId, Result, StepClock,
};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::ai::Ai;
use crate::engine::Client;

/// What the episode loop should do after one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Same episode, next iteration
    Continue,
    /// Episode over; may be followed by a reset
    Finished(MatchResult),
    /// Run over (game-time limit, AI fault or the client left the game); never reset
    Aborted(MatchResult),
}

/// Terminal result for the current snapshot, if any.
///
/// Engine-reported results win; otherwise no visible enemies counts as a
/// Victory and no own units as a Defeat.
pub fn resolve_terminal(
    engine_result: Option<&GameResults>,
    player_id: PlayerId,
    no_units: bool,
    no_enemies: bool,
) -> Option<MatchResult> {
    match engine_result {
        Some(results) => Some(match results.get(&player_id) {
            Some(MatchResult::Victory) => MatchResult::Victory,
            _ => MatchResult::Defeat,
        }),
        None if no_enemies => Some(MatchResult::Victory),
        None if no_units => Some(MatchResult::Defeat),
        None => None,
    }
}

/// Drives one bot through single iterations
pub struct StepDriver<'a> {
    pub(crate) client: &'a mut dyn Client,
    pub(crate) ai: &'a mut dyn Ai,
    pub(crate) player_id: PlayerId,
    pub(crate) options: &'a PlayOptions,
    game_data: Arc<GameData>,
    /// Iterations played in the current episode
    pub(crate) iteration: u64,
}

impl<'a> StepDriver<'a> {
    pub fn new(
        client: &'a mut dyn Client,
        ai: &'a mut dyn Ai,
        player_id: PlayerId,
        options: &'a PlayOptions,
        game_data: Arc<GameData>,
    ) -> Self {
        Self {
            client,
            ai,
            player_id,
            options,
            game_data,
            iteration: 0,
        }
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Run one iteration
    pub async fn step(&mut self) -> Result<StepOutcome> {
        let observation = self.client.observation().await?;
        let state = GameState::new(observation, self.game_data.clone());

        // Checked before the AI sees the snapshot
        if StepClock::exceeded(state.game_loop, self.options.game_time_limit) {
            info!(
                "Game time limit reached at game loop {} ({:.1}s)",
                state.game_loop,
                state.game_time().as_secs_f64()
            );
            return Ok(StepOutcome::Aborted(MatchResult::Tie));
        }

        self.ai.prepare_step(state);
        if let Some(result) = resolve_terminal(
            self.client.game_result(),
            self.player_id,
            self.ai.units().is_empty(),
            self.ai.known_enemy_units().is_empty(),
        ) {
            return Ok(StepOutcome::Finished(result));
        }

        if self.iteration == 0 {
            self.ai.prepare_first_step();
        }

        debug!("Running AI step, realtime={}", self.options.realtime);
        if let Err(e) = self.run_ai().await {
            error!("AI step threw an error: {:?}", e);
            error!("resigning due to previous error");
            return Ok(StepOutcome::Aborted(MatchResult::Defeat));
        }
        debug!("Running AI step: done");

        if !self.options.realtime {
            if !self.client.in_game() {
                let result = self
                    .client
                    .game_result()
                    .and_then(|results| results.get(&self.player_id))
                    .copied()
                    .unwrap_or(MatchResult::Defeat);
                info!("Player {} left the game: {}", self.player_id, result);
                return Ok(StepOutcome::Aborted(result));
            }

            self.client.step().await?;
        }

        self.iteration += 1;
        Ok(StepOutcome::Continue)
    }

    async fn run_ai(&mut self) -> anyhow::Result<()> {
        let iteration = self.iteration;
        let client = &mut *self.client;

        self.ai.issue_events(client).await?;

        if self.options.realtime {
            return self.ai.on_step(iteration, client).await;
        }

        let Some(limit) = self.options.step_time_limit else {
            return self.ai.on_step(iteration, client).await;
        };

        debug!("Running AI step, timeout={:?}", limit);
        match timeout(limit, self.ai.on_step(iteration, client)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Running AI step: out of time");
                Ok(())
            }
        }
    }
}
