//! # sc2-core
//!
//! Core types for orchestrating StarCraft II matches.
//!
//! This crate provides the value types shared by the runner and the engine bridge:
//! - Match results, races and game-creation errors
//! - Player setup and port configuration
//! - Raw observations and the decoded per-step game state
//! - Game-time accounting
//! - Match and engine configuration

pub mod clock;
pub mod config;
pub mod error;
pub mod game_state;
pub mod observation;
pub mod player;
pub mod portconfig;
pub mod result;

pub use clock::{STEP_DURATION_SECS, StepClock};
pub use config::{EngineConfig, MapSettings, MatchConfig, ParticipantConfig, PlayOptions};
pub use error::{Result, Sc2Error};
pub use game_state::GameState;
pub use observation::{
    Alliance, DisplayType, GameData, GameInfo, GameResults, Observation, PlayerResult, Status,
    Unit, UnitTypeData,
};
pub use player::{PlayerId, PlayerKind, PlayerSetup};
pub use portconfig::{PortSet, Portconfig};
pub use result::{AiBuild, CreateGameError, Difficulty, MatchResult, Race};
