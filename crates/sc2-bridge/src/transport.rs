//! Transport abstractions for the engine bridge
//!
//! Provides AsyncReader/AsyncWriter traits for framed byte transports and the
//! request/response connection built on top of them.

use crate::protocol::{EngineRequest, EngineResponse, ResponseFrame, deserialize, serialize};
use async_trait::async_trait;
use sc2_core::{Result, Sc2Error, Status};
use std::collections::VecDeque;
use std::fmt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Trait for async reading from a transport
#[async_trait]
pub trait AsyncReader: Send {
    /// Read a complete message from the transport
    /// Messages are length-prefixed: 4-byte little-endian length + JSON payload
    async fn read_message(&mut self) -> Result<Vec<u8>>;
}

/// Trait for async writing to a transport
#[async_trait]
pub trait AsyncWriter: Send {
    /// Write a complete message to the transport
    /// Messages are length-prefixed: 4-byte little-endian length + JSON payload
    async fn write_message(&mut self, data: &[u8]) -> Result<()>;
}

type Responder = oneshot::Sender<Result<ResponseFrame>>;

/// Request/response connection to one engine
///
/// Background tasks own the transport. The engine answers requests in order,
/// so each response goes to the oldest pending request. A caller that stops
/// waiting (for example a timed-out AI step) leaves its response to be
/// consumed and discarded by the connection task.
pub struct EngineConnection {
    requests: mpsc::Sender<(Vec<u8>, Responder)>,
    status: Status,
    tasks: [JoinHandle<()>; 2],
}

impl EngineConnection {
    /// Spawn the reader and connection tasks; needs a running tokio runtime
    pub fn new(reader: impl AsyncReader + 'static, writer: impl AsyncWriter + 'static) -> Self {
        let (request_tx, request_rx) = mpsc::channel(16);
        let (frame_tx, frame_rx) = mpsc::channel(16);
        let reader_handle = tokio::spawn(reader_task(reader, frame_tx));
        let connection_handle = tokio::spawn(connection_task(writer, request_rx, frame_rx));

        Self {
            requests: request_tx,
            status: Status::Launched,
            tasks: [reader_handle, connection_handle],
        }
    }

    /// Status reported with the last response
    pub fn status(&self) -> Status {
        self.status
    }

    /// Send one request and wait for its response
    pub async fn request(&mut self, request: &EngineRequest) -> Result<EngineResponse> {
        let data = serialize(request)?;
        debug!(
            "[Rust→Engine] len={} json={}",
            data.len(),
            String::from_utf8_lossy(&data)
        );

        let (response_tx, response_rx) = oneshot::channel();
        self.requests
            .send((data, response_tx))
            .await
            .map_err(|_| Sc2Error::ConnectionClosed)?;
        let frame = response_rx
            .await
            .map_err(|_| Sc2Error::ConnectionClosed)??;
        self.status = frame.status;

        match frame.response {
            EngineResponse::Error { message } => Err(Sc2Error::Engine(message)),
            response => Ok(response),
        }
    }
}

impl fmt::Debug for EngineConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConnection")
            .field("status", &self.status)
            .field("closed", &self.requests.is_closed())
            .finish()
    }
}

impl Drop for EngineConnection {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Forward every frame read from the engine; stops after the first read error
async fn reader_task<R: AsyncReader>(mut reader: R, frames: mpsc::Sender<Result<Vec<u8>>>) {
    loop {
        let message = reader.read_message().await;
        let failed = message.is_err();
        if frames.send(message).await.is_err() || failed {
            debug!("Engine reader task exiting");
            break;
        }
    }
}

/// Write requests and hand each response to the oldest pending request
///
/// Frames are only taken while a request is pending, so a read error surfaces
/// on the next request instead of being lost.
async fn connection_task<W: AsyncWriter>(
    mut writer: W,
    mut requests: mpsc::Receiver<(Vec<u8>, Responder)>,
    mut frames: mpsc::Receiver<Result<Vec<u8>>>,
) {
    let mut pending: VecDeque<Responder> = VecDeque::new();

    loop {
        tokio::select! {
            request = requests.recv() => {
                let Some((data, responder)) = request else {
                    debug!("Request channel closed, connection task exiting");
                    break;
                };
                if let Err(e) = writer.write_message(&data).await {
                    error!("Writing to engine failed: {}", e);
                    let _ = responder.send(Err(e));
                    break;
                }
                pending.push_back(responder);
            }

            frame = frames.recv(), if !pending.is_empty() => {
                match frame {
                    Some(Ok(data)) => {
                        let json_preview: String =
                            String::from_utf8_lossy(&data).chars().take(200).collect();
                        debug!("[Engine→Rust] len={} json={}", data.len(), json_preview);

                        let response = deserialize(&data).map_err(|e| {
                            error!("Failed to deserialize response: {}", e);
                            Sc2Error::from(e)
                        });
                        match pending.pop_front() {
                            Some(responder) => {
                                if responder.send(response).is_err() {
                                    warn!(
                                        "Discarding response to an abandoned request: {}",
                                        json_preview
                                    );
                                }
                            }
                            None => warn!(
                                "Received response but no pending request: {}",
                                json_preview
                            ),
                        }
                    }
                    Some(Err(e)) => {
                        error!("Engine connection lost: {}", e);
                        if let Some(responder) = pending.pop_front() {
                            let _ = responder.send(Err(e));
                        }
                        break;
                    }
                    None => break,
                }
            }
        }
    }
    // Remaining requesters see their channel close as ConnectionClosed
}

/// Build the error for a response that does not match its request
pub(crate) fn unexpected(request: &str, response: EngineResponse) -> Sc2Error {
    Sc2Error::Protocol(format!(
        "Unexpected response to {}: {:?}",
        request, response
    ))
}
