//! Per-participant match outcome

use sc2_core::{MatchResult, PlayerId};

/// What one controlled participant got out of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayReport {
    pub player_id: PlayerId,
    /// Resolved result of the last episode played
    pub result: MatchResult,
    /// Episodes resolved as Victory
    pub wins: u32,
    /// Episodes played
    pub runs: u32,
}

impl PlayReport {
    /// Report for a single-episode match
    pub fn single(player_id: PlayerId, result: MatchResult) -> Self {
        Self {
            player_id,
            result,
            wins: u32::from(result == MatchResult::Victory),
            runs: 1,
        }
    }
}
