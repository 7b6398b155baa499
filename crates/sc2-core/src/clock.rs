//! Game-loop to game-time conversion

use std::time::Duration;

/// Game seconds covered by one engine game loop
pub const STEP_DURATION_SECS: f64 = 0.725 / 16.0;

/// Converts the engine's `game_loop` counter into elapsed game time
pub struct StepClock;

impl StepClock {
    /// Game time elapsed after `game_loop` loops
    pub fn elapsed(game_loop: u64) -> Duration {
        Duration::from_secs_f64(Self::elapsed_secs(game_loop))
    }

    /// Same as [`StepClock::elapsed`], in seconds
    pub fn elapsed_secs(game_loop: u64) -> f64 {
        game_loop as f64 * STEP_DURATION_SECS
    }

    /// Whether the budget is strictly exceeded. `None` never expires.
    pub fn exceeded(game_loop: u64, limit: Option<Duration>) -> bool {
        match limit {
            Some(limit) => Self::elapsed_secs(game_loop) > limit.as_secs_f64(),
            None => false,
        }
    }
}
