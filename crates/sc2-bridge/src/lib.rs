//! Engine bridge for the sc2 match runner
//!
//! This crate provides:
//! - Wire protocol for engine requests and responses
//! - Transport abstractions (AsyncReader/AsyncWriter traits)
//! - Length-prefixed TCP transport
//! - `EngineLauncher`, `BridgeServer` and `BridgeClient`, the concrete
//!   `Launcher`/`Server`/`Client` implementations

pub mod client;
pub mod protocol;
pub mod server;
pub mod tcp;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::BridgeClient;
pub use protocol::{EngineRequest, EngineResponse, ResponseFrame, deserialize, serialize};
pub use server::{BridgeServer, EngineLauncher};
pub use transport::{AsyncReader, AsyncWriter, EngineConnection};
