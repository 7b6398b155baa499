//! Polling loop for a human-controlled slot

use sc2_core::{MatchResult, PlayOptions, PlayerId, Result, StepClock};
use tracing::info;

use crate::engine::Client;

/// Keep the game going until the engine reports a result or game time runs out
pub async fn play_human(
    client: &mut dyn Client,
    player_id: PlayerId,
    options: &PlayOptions,
) -> Result<MatchResult> {
    loop {
        let observation = client.observation().await?;
        if let Some(results) = client.game_result() {
            return Ok(results
                .get(&player_id)
                .copied()
                .unwrap_or(MatchResult::Undecided));
        }

        if StepClock::exceeded(observation.game_loop, options.game_time_limit) {
            info!(
                "Game time limit reached at game loop {}",
                observation.game_loop
            );
            return Ok(MatchResult::Tie);
        }

        if !options.realtime {
            client.step().await?;
        }
    }
}
