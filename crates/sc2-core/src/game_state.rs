//! Decoded per-iteration snapshot handed to the AI

use crate::clock::StepClock;
use crate::observation::{Alliance, DisplayType, GameData, Observation, Unit};
use std::sync::Arc;
use std::time::Duration;

/// View of one observation from the controlled player's side
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Engine step counter
    pub game_loop: u64,
    /// Units owned by the controlled player
    pub units: Vec<Unit>,
    /// Enemy units currently in vision
    pub enemy_units: Vec<Unit>,
    /// Everything else (neutral, allied, enemy snapshots)
    pub other_units: Vec<Unit>,
    /// Static data for the running game
    pub game_data: Arc<GameData>,
}

impl GameState {
    /// Decode a raw observation
    pub fn new(observation: Observation, game_data: Arc<GameData>) -> Self {
        let mut units = Vec::new();
        let mut enemy_units = Vec::new();
        let mut other_units = Vec::new();

        for unit in observation.units {
            match (unit.alliance, unit.display_type) {
                (Alliance::Own, _) => units.push(unit),
                (Alliance::Enemy, DisplayType::Visible) => enemy_units.push(unit),
                _ => other_units.push(unit),
            }
        }

        Self {
            game_loop: observation.game_loop,
            units,
            enemy_units,
            other_units,
            game_data,
        }
    }

    /// Type name of a unit, if the game data knows it
    pub fn unit_name(&self, unit: &Unit) -> Option<&str> {
        self.game_data.unit_name(unit.unit_type)
    }

    /// In-game time elapsed at this snapshot
    pub fn game_time(&self) -> Duration {
        StepClock::elapsed(self.game_loop)
    }
}
