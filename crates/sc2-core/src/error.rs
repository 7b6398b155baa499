//! Error types for match orchestration

use thiserror::Error;

use crate::result::CreateGameError;

/// Result type for sc2 match operations
pub type Result<T> = std::result::Result<T, Sc2Error>;

/// Errors raised while talking to the engine or running a match
#[derive(Debug, Error)]
pub enum Sc2Error {
    /// The engine rejected game creation
    #[error("Could not create game: {error}{}", .details.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    GameCreation {
        error: CreateGameError,
        details: Option<String>,
    },

    /// The connection to the engine closed before the game ended
    #[error("Connection was closed before the game ended")]
    ConnectionClosed,

    /// Unexpected response or malformed frame
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Transport failure other than a clean close
    #[error("IPC error: {0}")]
    Ipc(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error reported by the engine for a request
    #[error("Engine error: {0}")]
    Engine(String),

    /// Rejected match or engine configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Engine process could not be spawned or reached
    #[error("Process error: {0}")]
    Process(String),
}

impl Sc2Error {
    /// True when the error means the engine connection is gone
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, Sc2Error::ConnectionClosed)
    }
}

impl From<serde_json::Error> for Sc2Error {
    fn from(err: serde_json::Error) -> Self {
        Sc2Error::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for Sc2Error {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::UnexpectedEof
            | ErrorKind::BrokenPipe
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted => Sc2Error::ConnectionClosed,
            _ => Sc2Error::Ipc(err.to_string()),
        }
    }
}
