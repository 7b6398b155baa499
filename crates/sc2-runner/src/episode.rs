//! Episode loop: repeats the step driver across one or more episodes

use sc2_core::{MatchResult, PlayOptions, PlayerId, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::ai::Ai;
use crate::driver::{StepDriver, StepOutcome};
use crate::engine::{Client, Server};
use crate::report::PlayReport;

/// Bot play across episodes, with optional in-place resets
pub struct EpisodeLoop<'a, S: Server> {
    server: &'a mut S,
    driver: StepDriver<'a>,
    /// Completed episodes; never reset
    run: u32,
    /// Episodes resolved as Victory; never reset
    num_wins: u32,
}

impl<'a, S: Server> EpisodeLoop<'a, S> {
    pub fn new(server: &'a mut S, driver: StepDriver<'a>) -> Self {
        Self {
            server,
            driver,
            run: 0,
            num_wins: 0,
        }
    }

    /// Play until the last episode ends
    pub async fn run(mut self) -> Result<PlayReport> {
        loop {
            let (result, aborted) = match self.driver.step().await? {
                StepOutcome::Continue => continue,
                StepOutcome::Finished(result) => (result, false),
                StepOutcome::Aborted(result) => (result, true),
            };

            self.run += 1;
            if result == MatchResult::Victory {
                self.num_wins += 1;
            }
            info!(
                "Episode {} finished for player {}: {}",
                self.run, self.driver.player_id, result
            );

            let options = self.driver.options;
            if !aborted && options.reset && self.run < options.num_runs {
                debug!("Result obtained. Reset...");
                self.server.restart_game().await?;
                self.driver.ai.on_reset(Some(result));
                self.driver.client.clear_game_result();
                self.driver.iteration = 0;
                continue;
            }

            self.driver.ai.on_end(result);
            return Ok(PlayReport {
                player_id: self.driver.player_id,
                result,
                wins: self.num_wins,
                runs: self.run,
            });
        }
    }
}

/// Full bot lifecycle on a joined game: setup hooks, then the episode loop
pub async fn play_bot<S: Server>(
    server: &mut S,
    client: &mut dyn Client,
    player_id: PlayerId,
    ai: &mut dyn Ai,
    options: &PlayOptions,
) -> Result<PlayReport> {
    let game_data = client.game_data().await?;
    let game_info = client.game_info().await?;
    debug!("Game info for player {}: {}", player_id, game_info.map_name);

    ai.prepare_start(player_id, &game_info, &game_data);
    ai.on_start();
    ai.on_reset(None);

    let driver = StepDriver::new(client, ai, player_id, options, Arc::new(game_data));
    EpisodeLoop::new(server, driver).run().await
}
