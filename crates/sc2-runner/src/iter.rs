//! Play a series of games on one engine process, one game per `advance`

use sc2_core::{MapSettings, PlayOptions, Result};
use tracing::{debug, info};

use crate::engine::{Client, Launcher, Server};
use crate::orchestrator::{abandon_on_close, play_game, setup_host_game, validate_players};
use crate::participant::{Participant, player_setups};
use crate::report::PlayReport;

/// Externally driven sequence of games.
///
/// Each [`MatchIter::advance`] creates a fresh game on the same engine, plays
/// it, saves the replay as `<run><name>` and leaves without quitting. After a
/// closed connection the sequence is exhausted and every call returns `None`.
pub struct MatchIter<S: Server> {
    server: S,
    map: MapSettings,
    players: Vec<Participant>,
    options: PlayOptions,
    run: u32,
    exhausted: bool,
}

impl<S: Server> MatchIter<S> {
    /// Launch the engine that will host every game
    pub async fn start<L>(
        launcher: &L,
        map: MapSettings,
        players: Vec<Participant>,
        options: PlayOptions,
    ) -> Result<Self>
    where
        L: Launcher<Server = S>,
    {
        validate_players(&players)?;
        let server = launcher.launch().await?;
        // Reset mode restarts in place; here every game is created fresh
        let options = PlayOptions {
            reset: false,
            num_runs: 1,
            ..options
        };
        Ok(Self {
            server,
            map,
            players,
            options,
            run: 0,
            exhausted: false,
        })
    }

    /// Games completed so far
    pub fn runs(&self) -> u32 {
        self.run
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Play the next game, optionally with a new participant list first
    pub async fn advance(
        &mut self,
        new_players: Option<Vec<Participant>>,
    ) -> Result<Option<PlayReport>> {
        if self.exhausted {
            return Ok(None);
        }
        if let Some(players) = new_players {
            validate_players(&players)?;
            debug!("Replacing participants: {:?}", players);
            self.players = players;
        }

        let outcome = self.play_next().await;
        let report = abandon_on_close(outcome)?;
        if report.is_none() {
            self.exhausted = true;
        }
        Ok(report)
    }

    async fn play_next(&mut self) -> Result<PlayReport> {
        self.server.ping().await?;

        let setups = player_setups(&self.players);
        let mut client =
            setup_host_game(&mut self.server, &self.map, &setups, self.options.realtime).await?;
        client.set_game_step(self.options.game_steps);

        let report = play_game(
            &mut self.server,
            &mut self.players[0],
            &mut client,
            &self.options,
            None,
        )
        .await?;
        self.run += 1;
        info!("Game {} finished: {}", self.run, report.result);

        if let Some(name) = &self.options.save_replay_as {
            let path = self.options.replay_dir.join(format!("{}{}", self.run, name));
            client.save_replay(&path).await?;
        }
        client.leave().await?;
        Ok(report)
    }

    /// Stop the engine
    pub async fn close(mut self) -> Result<()> {
        self.server.shutdown().await
    }
}
