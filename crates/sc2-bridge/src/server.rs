//! Engine process launcher and server control handle

use async_trait::async_trait;
use sc2_core::{EngineConfig, MapSettings, PlayerSetup, Result, Sc2Error};
use sc2_runner::{CreateGameResponse, Launcher, Server};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::client::BridgeClient;
use crate::protocol::{EngineRequest, EngineResponse};
use crate::tcp;
use crate::transport::{EngineConnection, unexpected};

/// Delay between connection attempts while the engine starts up
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Starts one engine per launch, or attaches to an already-running one
#[derive(Debug, Clone)]
pub struct EngineLauncher {
    config: EngineConfig,
    spawn: bool,
}

impl EngineLauncher {
    /// Spawn the configured engine executable for every launch
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            spawn: true,
        }
    }

    /// Connect to an engine that is already listening at the configured address
    pub fn attach(config: EngineConfig) -> Self {
        Self {
            config,
            spawn: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn spawn_engine(&self, port: u16) -> Result<Child> {
        let mut command = Command::new(&self.config.executable);
        command
            .arg("-listen")
            .arg(&self.config.host)
            .arg("-port")
            .arg(port.to_string())
            .arg("-displayMode")
            .arg("0")
            .args(&self.config.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }

        info!(
            "Launching engine {} on {}:{}",
            self.config.executable.display(),
            self.config.host,
            port
        );
        command.spawn().map_err(|e| {
            Sc2Error::Process(format!(
                "Failed to spawn {}: {}",
                self.config.executable.display(),
                e
            ))
        })
    }

    /// Keep trying to connect until the engine listens or the timeout passes
    async fn connect_with_retry(
        &self,
        port: u16,
        child: &mut Option<Child>,
    ) -> Result<EngineConnection> {
        // No deadline when the timeout does not fit an Instant
        let deadline = self
            .config
            .connect_timeout()
            .and_then(|timeout| Instant::now().checked_add(timeout));
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match tcp::connect(&self.config.host, port).await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    if let Some(process) = child.as_mut() {
                        if let Some(status) = process.try_wait()? {
                            return Err(Sc2Error::Process(format!(
                                "Engine exited before accepting connections: {}",
                                status
                            )));
                        }
                    }
                    if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                        return Err(Sc2Error::Process(format!(
                            "Could not connect to engine at {}:{} after {} attempts: {}",
                            self.config.host, port, attempt, e
                        )));
                    }
                    debug!("Engine not reachable yet (attempt {}): {}", attempt, e);
                    sleep(CONNECT_RETRY_DELAY).await;
                }
            }
        }
    }
}

#[async_trait]
impl Launcher for EngineLauncher {
    type Server = BridgeServer;

    async fn launch(&self) -> Result<BridgeServer> {
        let port = match self.config.port {
            0 if self.spawn => free_port()?,
            0 => {
                return Err(Sc2Error::InvalidConfig(
                    "An engine port is required to attach".into(),
                ));
            }
            port => port,
        };

        let mut child = if self.spawn {
            Some(self.spawn_engine(port)?)
        } else {
            None
        };
        let conn = self.connect_with_retry(port, &mut child).await?;
        info!("Engine ready on {}:{}", self.config.host, port);

        Ok(BridgeServer::new(conn, child))
    }
}

/// Pick a port nothing currently listens on
fn free_port() -> Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

/// Control handle of one engine; its clients share the same connection
#[derive(Debug)]
pub struct BridgeServer {
    conn: Arc<Mutex<EngineConnection>>,
    process: Option<Child>,
}

impl BridgeServer {
    pub fn new(conn: EngineConnection, process: Option<Child>) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            process,
        }
    }

    async fn request(&mut self, request: EngineRequest) -> Result<EngineResponse> {
        self.conn.lock().await.request(&request).await
    }
}

#[async_trait]
impl Server for BridgeServer {
    type Client = BridgeClient;

    async fn ping(&mut self) -> Result<()> {
        match self.request(EngineRequest::Ping).await? {
            EngineResponse::Pong { game_version } => {
                debug!("Engine version {}", game_version);
                Ok(())
            }
            other => Err(unexpected("Ping", other)),
        }
    }

    async fn create_game(
        &mut self,
        map: &MapSettings,
        players: &[PlayerSetup],
        realtime: bool,
    ) -> Result<CreateGameResponse> {
        let request = EngineRequest::CreateGame {
            map_path: map.path.display().to_string(),
            players: players.to_vec(),
            realtime,
        };
        match self.request(request).await? {
            EngineResponse::CreateGame {
                error,
                error_details,
            } => Ok(CreateGameResponse {
                error,
                error_details,
            }),
            other => Err(unexpected("CreateGame", other)),
        }
    }

    async fn restart_game(&mut self) -> Result<()> {
        match self.request(EngineRequest::RestartGame).await? {
            EngineResponse::RestartGame => Ok(()),
            other => Err(unexpected("RestartGame", other)),
        }
    }

    fn client(&mut self) -> Result<BridgeClient> {
        Ok(BridgeClient::new(self.conn.clone()))
    }

    async fn shutdown(&mut self) -> Result<()> {
        match self.request(EngineRequest::Quit).await {
            Ok(_) => {}
            Err(e) if e.is_connection_closed() => {}
            Err(e) => warn!("Engine did not acknowledge quit: {}", e),
        }

        if let Some(mut process) = self.process.take() {
            if process.try_wait()?.is_none() {
                process.start_kill()?;
            }
            let status = process.wait().await?;
            debug!("Engine process exited: {}", status);
        }
        Ok(())
    }
}
