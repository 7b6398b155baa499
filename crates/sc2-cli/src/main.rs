//! sc2-match: run one StarCraft II match from a JSON config
//!
//! Usage: `sc2-match <config.json> [--attach]`
//!
//! With `--attach` the runner connects to an engine already listening at the
//! configured host and port instead of launching one.

use anyhow::{Context, Result, bail};
use sc2_bridge::EngineLauncher;
use sc2_core::MatchConfig;
use sc2_runner::{MatchOutcome, Participant, PlayReport, run_game};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn log_report(side: &str, report: Option<PlayReport>) {
    match report {
        Some(report) => info!(
            "{}: player {} finished with {} ({} wins in {} runs)",
            side, report.player_id, report.result, report.wins, report.runs
        ),
        None => warn!("{}: connection closed before the game ended", side),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config_path = None;
    let mut attach = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--attach" => attach = true,
            other if config_path.is_none() => config_path = Some(other.to_string()),
            other => bail!("Unexpected argument: {}", other),
        }
    }
    let Some(config_path) = config_path else {
        bail!("Usage: sc2-match <config.json> [--attach]");
    };

    let config = MatchConfig::from_file(&config_path)
        .with_context(|| format!("Loading match config {}", config_path))?;
    let map = config.map_settings();
    let options = config.play_options();
    let mut players: Vec<Participant> = config
        .participants
        .iter()
        .cloned()
        .map(Participant::from)
        .collect();

    let launcher = if attach {
        EngineLauncher::attach(config.engine.clone())
    } else {
        EngineLauncher::new(config.engine.clone())
    };

    info!(
        "Starting match on {} with {} participants",
        map.path.display(),
        players.len()
    );
    match run_game(&launcher, &map, &mut players, &options).await? {
        MatchOutcome::Single(report) => log_report("Host", report),
        MatchOutcome::Pair(host, join) => {
            log_report("Host", host);
            log_report("Join", join);
        }
    }

    Ok(())
}
