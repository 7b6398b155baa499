//! # sc2-runner
//!
//! Match orchestration for StarCraft II participants.
//!
//! This crate provides:
//! - `Launcher`, `Server` and `Client` traits for plugging in an engine transport
//! - The `Ai` trait bots implement
//! - The step driver and episode loop (time budgets, terminal detection, resets)
//! - Host/join orchestration and the two-participant runner
//! - `MatchIter` for playing a series of games on one engine

pub mod ai;
pub mod driver;
pub mod engine;
pub mod episode;
pub mod human;
pub mod iter;
pub mod orchestrator;
pub mod participant;
pub mod report;

#[cfg(test)]
pub(crate) mod test_support;

pub use ai::Ai;
pub use driver::{StepDriver, StepOutcome, resolve_terminal};
pub use engine::{Client, CreateGameResponse, Launcher, Server};
pub use episode::{EpisodeLoop, play_bot};
pub use human::play_human;
pub use iter::MatchIter;
pub use orchestrator::{MatchOutcome, host_game, join_game, run_game};
pub use participant::{Participant, player_setups};
pub use report::PlayReport;
