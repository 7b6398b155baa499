//! Port assignment shared by the host and joining participants

use serde::{Deserialize, Serialize};
use std::net::TcpListener;

use crate::error::{Result, Sc2Error};

/// Game/base port pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PortSet {
    pub game_port: u16,
    pub base_port: u16,
}

/// Ports every participant of a multiplayer game must agree on.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Portconfig {
    pub shared: u16,
    pub server: PortSet,
    pub players: Vec<PortSet>,
}

impl Portconfig {
    /// Allocate ports for a two-player game: the host uses the server pair,
    /// the single joining player gets one player pair
    pub fn new() -> Result<Self> {
        Self::allocate(1)
    }

    /// Allocate free local ports with one player port pair per joining player
    pub fn allocate(guests: usize) -> Result<Self> {
        // Hold every listener until all ports are picked so none repeats
        let needed = 3 + guests * 2;
        let mut listeners = Vec::with_capacity(needed);
        let mut ports = Vec::with_capacity(needed);
        for _ in 0..needed {
            let listener = TcpListener::bind("127.0.0.1:0")
                .map_err(|e| Sc2Error::Ipc(format!("Failed to pick a free port: {}", e)))?;
            ports.push(listener.local_addr()?.port());
            listeners.push(listener);
        }

        let mut iter = ports.into_iter();
        let mut next = || iter.next().unwrap_or_default();
        let shared = next();
        let server = PortSet {
            game_port: next(),
            base_port: next(),
        };
        let players = (0..guests)
            .map(|_| PortSet {
                game_port: next(),
                base_port: next(),
            })
            .collect();

        Ok(Self {
            shared,
            server,
            players,
        })
    }

    /// Every port in this configuration
    pub fn all_ports(&self) -> Vec<u16> {
        let mut ports = vec![self.shared, self.server.game_port, self.server.base_port];
        for set in &self.players {
            ports.push(set.game_port);
            ports.push(set.base_port);
        }
        ports
    }
}
