//! AI capability set driven by the step loop

use async_trait::async_trait;
use sc2_core::{GameData, GameInfo, GameState, MatchResult, PlayerId, Unit};

use crate::engine::Client;

/// A bot bound to a participant slot.
///
/// Hooks are called in this order: `prepare_start`, `on_start`,
/// `on_reset(None)`, then per iteration `prepare_step`,
/// `prepare_first_step` (first iteration of an episode only),
/// `issue_events`, `on_step`. `on_reset(Some(result))` runs between
/// episodes in reset mode and `on_end` exactly once at the end of the run.
#[async_trait]
pub trait Ai: Send {
    /// Static game information, once per match
    fn prepare_start(&mut self, _player_id: PlayerId, _game_info: &GameInfo, _game_data: &GameData) {
    }

    fn on_start(&mut self) {}

    /// Called at match start with `None` and after every reset with the finished episode's result
    fn on_reset(&mut self, _previous: Option<MatchResult>) {}

    /// Take ownership of this iteration's snapshot
    fn prepare_step(&mut self, state: GameState);

    fn prepare_first_step(&mut self) {}

    /// Units the bot controls in the current snapshot
    fn units(&self) -> &[Unit];

    /// Enemy units the bot currently sees
    fn known_enemy_units(&self) -> &[Unit];

    async fn issue_events(&mut self, _client: &mut dyn Client) -> anyhow::Result<()> {
        Ok(())
    }

    /// Per-step decision. An error ends the run with Defeat.
    async fn on_step(&mut self, iteration: u64, client: &mut dyn Client) -> anyhow::Result<()>;

    fn on_end(&mut self, _result: MatchResult) {}
}
