//! Match orchestration: create/join → play → replay → leave → quit

use sc2_core::{MapSettings, PlayOptions, PlayerSetup, Portconfig, Result, Sc2Error};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::engine::{Client, Launcher, Server};
use crate::episode::play_bot;
use crate::human::play_human;
use crate::participant::{Participant, player_setups};
use crate::report::PlayReport;

/// Result of [`run_game`]; `None` means the connection closed before the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Single(Option<PlayReport>),
    /// Host and join side
    Pair(Option<PlayReport>, Option<PlayReport>),
}

/// Hosting requires players and a controlled participant in the host slot
pub(crate) fn validate_players(players: &[Participant]) -> Result<()> {
    let Some(host) = players.first() else {
        return Err(Sc2Error::InvalidConfig(
            "Can't create a game without players".into(),
        ));
    };
    if !host.is_controlled() {
        return Err(Sc2Error::InvalidConfig(format!(
            "Host slot must be a human or a bot, got {:?}",
            host
        )));
    }
    Ok(())
}

/// Join (or after hosting, enter) the game and play it out
pub(crate) async fn play_game<S: Server>(
    server: &mut S,
    participant: &mut Participant,
    client: &mut dyn Client,
    options: &PlayOptions,
    portconfig: Option<&Portconfig>,
) -> Result<PlayReport> {
    let player_id = client.join_game(participant.race(), portconfig).await?;
    info!("Player id: {}", player_id);

    let report = match participant {
        Participant::Human { .. } => {
            let result = play_human(client, player_id, options).await?;
            PlayReport::single(player_id, result)
        }
        Participant::Bot { ai, .. } => {
            play_bot(server, client, player_id, ai.as_mut(), options).await?
        }
        Participant::Computer { .. } => {
            return Err(Sc2Error::InvalidConfig(
                "Computer players are run by the engine".into(),
            ));
        }
    };

    info!("Result for player id: {}: {}", player_id, report.result);
    Ok(report)
}

/// Ask the engine to create the game and hand back a client for it
pub(crate) async fn setup_host_game<S: Server>(
    server: &mut S,
    map: &MapSettings,
    setups: &[PlayerSetup],
    realtime: bool,
) -> Result<S::Client> {
    let response = server.create_game(map, setups, realtime).await?;
    if let Some(error) = response.error {
        let err = Sc2Error::GameCreation {
            error,
            details: response.error_details,
        };
        error!("{}", err);
        return Err(err);
    }

    server.client()
}

/// Play, save the replay, then leave and quit
async fn finish_match<S: Server>(
    server: &mut S,
    client: &mut S::Client,
    participant: &mut Participant,
    options: &PlayOptions,
    portconfig: Option<&Portconfig>,
    replay_path: Option<&Path>,
) -> Result<PlayReport> {
    let report = play_game(server, participant, client, options, portconfig).await?;
    if let Some(path) = replay_path {
        client.save_replay(path).await?;
    }
    client.leave().await?;
    client.quit().await?;
    Ok(report)
}

/// A closed connection abandons the match instead of failing it
pub(crate) fn abandon_on_close(outcome: Result<PlayReport>) -> Result<Option<PlayReport>> {
    match outcome {
        Ok(report) => Ok(Some(report)),
        Err(Sc2Error::ConnectionClosed) => {
            error!("Connection was closed before the game ended");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

async fn shutdown_server<S: Server>(server: &mut S) {
    if let Err(e) = server.shutdown().await {
        warn!("Engine shutdown failed: {}", e);
    }
}

async fn host_on_server<S: Server>(
    server: &mut S,
    map: &MapSettings,
    setups: &[PlayerSetup],
    participant: &mut Participant,
    options: &PlayOptions,
    portconfig: Option<&Portconfig>,
) -> Result<PlayReport> {
    server.ping().await?;
    let mut client = setup_host_game(server, map, setups, options.realtime).await?;
    client.set_game_step(options.game_steps);

    let replay_path = options.replay_path();
    finish_match(
        server,
        &mut client,
        participant,
        options,
        portconfig,
        replay_path.as_deref(),
    )
    .await
}

async fn host_with_setups<L: Launcher>(
    launcher: &L,
    map: &MapSettings,
    setups: &[PlayerSetup],
    participant: &mut Participant,
    options: &PlayOptions,
    portconfig: Option<&Portconfig>,
) -> Result<Option<PlayReport>> {
    let mut server = launcher.launch().await?;
    let outcome =
        host_on_server(&mut server, map, setups, participant, options, portconfig).await;
    shutdown_server(&mut server).await;
    abandon_on_close(outcome)
}

/// Launch an engine, create the game and play slot 0
pub async fn host_game<L: Launcher>(
    launcher: &L,
    map: &MapSettings,
    players: &mut [Participant],
    options: &PlayOptions,
    portconfig: Option<&Portconfig>,
) -> Result<Option<PlayReport>> {
    validate_players(players)?;
    let setups = player_setups(players);
    host_with_setups(launcher, map, &setups, &mut players[0], options, portconfig).await
}

async fn join_with<L: Launcher>(
    launcher: &L,
    participant: &mut Participant,
    options: &PlayOptions,
    portconfig: &Portconfig,
) -> Result<Option<PlayReport>> {
    if !participant.is_controlled() {
        return Err(Sc2Error::InvalidConfig(format!(
            "Join slot must be a human or a bot, got {:?}",
            participant
        )));
    }

    let mut server = launcher.launch().await?;
    let outcome = join_on_server(&mut server, participant, options, portconfig).await;
    shutdown_server(&mut server).await;
    abandon_on_close(outcome)
}

async fn join_on_server<S: Server>(
    server: &mut S,
    participant: &mut Participant,
    options: &PlayOptions,
    portconfig: &Portconfig,
) -> Result<PlayReport> {
    server.ping().await?;
    let mut client = server.client()?;
    client.set_game_step(options.game_steps);

    let replay_path = options.save_replay_as.as_ref().map(PathBuf::from);
    finish_match(
        server,
        &mut client,
        participant,
        options,
        Some(portconfig),
        replay_path.as_deref(),
    )
    .await
}

/// Launch an engine and join the game hosted for slot 0 as slot 1
pub async fn join_game<L: Launcher>(
    launcher: &L,
    players: &mut [Participant],
    options: &PlayOptions,
    portconfig: &Portconfig,
) -> Result<Option<PlayReport>> {
    let participant = players.get_mut(1).ok_or_else(|| {
        Sc2Error::InvalidConfig("Joining needs a participant in slot 1".into())
    })?;
    join_with(launcher, participant, options, portconfig).await
}

/// Run one match.
///
/// With two controlled participants the host and join sides run concurrently
/// on the current task, each with its own engine, sharing one port config.
pub async fn run_game<L: Launcher>(
    launcher: &L,
    map: &MapSettings,
    players: &mut [Participant],
    options: &PlayOptions,
) -> Result<MatchOutcome> {
    validate_players(players)?;

    let controlled = players.iter().filter(|p| p.is_controlled()).count();
    if controlled < 2 {
        let report = host_game(launcher, map, players, options, None).await?;
        return Ok(MatchOutcome::Single(report));
    }

    let portconfig = Arc::new(Portconfig::new()?);
    let setups = player_setups(players);
    let join_options = PlayOptions {
        save_replay_as: None,
        ..options.clone()
    };

    let (host_slot, rest) = players.split_at_mut(1);
    let join_slot = rest
        .first_mut()
        .ok_or_else(|| Sc2Error::InvalidConfig("Joining needs a participant in slot 1".into()))?;

    let (host, join) = tokio::join!(
        host_with_setups(
            launcher,
            map,
            &setups,
            &mut host_slot[0],
            options,
            Some(&*portconfig),
        ),
        join_with(launcher, join_slot, &join_options, &portconfig),
    );

    Ok(MatchOutcome::Pair(host?, join?))
}
