//! Participant slots of a match

use sc2_core::{AiBuild, Difficulty, ParticipantConfig, PlayerSetup, Race};
use std::fmt;

use crate::ai::Ai;

/// One slot of a match. Slot 0 hosts, slot 1 joins.
pub enum Participant {
    /// Played through the engine UI
    Human { race: Race, name: Option<String> },
    /// Driven by an [`Ai`]
    Bot {
        race: Race,
        ai: Box<dyn Ai>,
        name: Option<String>,
    },
    /// Engine built-in opponent, needs no connection of its own
    Computer {
        race: Race,
        difficulty: Difficulty,
        ai_build: AiBuild,
    },
}

impl Participant {
    pub fn human(race: Race) -> Self {
        Participant::Human { race, name: None }
    }

    pub fn bot(race: Race, ai: impl Ai + 'static) -> Self {
        Participant::Bot {
            race,
            ai: Box::new(ai),
            name: None,
        }
    }

    pub fn computer(race: Race, difficulty: Difficulty) -> Self {
        Participant::Computer {
            race,
            difficulty,
            ai_build: AiBuild::RandomBuild,
        }
    }

    pub fn race(&self) -> Race {
        match self {
            Participant::Human { race, .. }
            | Participant::Bot { race, .. }
            | Participant::Computer { race, .. } => *race,
        }
    }

    /// Human or bot; needs its own engine connection
    pub fn is_controlled(&self) -> bool {
        !matches!(self, Participant::Computer { .. })
    }

    /// Slot description for the create-game request
    pub fn setup(&self) -> PlayerSetup {
        match self {
            Participant::Human { race, name } | Participant::Bot { race, name, .. } => {
                let setup = PlayerSetup::participant(*race);
                match name {
                    Some(name) => setup.with_name(name.clone()),
                    None => setup,
                }
            }
            Participant::Computer {
                race,
                difficulty,
                ai_build,
            } => PlayerSetup::computer(*race, *difficulty, *ai_build),
        }
    }
}

impl From<ParticipantConfig> for Participant {
    fn from(config: ParticipantConfig) -> Self {
        match config {
            ParticipantConfig::Human { race, name } => Participant::Human { race, name },
            ParticipantConfig::Computer {
                race,
                difficulty,
                ai_build,
            } => Participant::Computer {
                race,
                difficulty,
                ai_build,
            },
        }
    }
}

impl fmt::Debug for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Human { race, .. } => write!(f, "Human({:?})", race),
            Participant::Bot { race, .. } => write!(f, "Bot({:?})", race),
            Participant::Computer {
                race, difficulty, ..
            } => write!(f, "Computer({:?}, {:?})", race, difficulty),
        }
    }
}

/// Player setups for every slot
pub fn player_setups(players: &[Participant]) -> Vec<PlayerSetup> {
    players.iter().map(Participant::setup).collect()
}
