//! Loopback fake engine for bridge tests

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::tcp::{self, FrameReader, FrameWriter};
use crate::transport::{AsyncReader, AsyncWriter, EngineConnection};

/// Engine that answers each request with the next scripted frame, then hangs up
pub(crate) struct ScriptedEngine {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ScriptedEngine {
    pub(crate) async fn start(responses: Vec<&'static str>) -> Self {
        Self::start_delayed(
            responses
                .into_iter()
                .map(|response| (response, Duration::ZERO))
                .collect(),
        )
        .await
    }

    /// Like `start`, but each response is sent only after its delay
    pub(crate) async fn start_delayed(responses: Vec<(&'static str, Duration)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = requests.clone();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, write_half) = stream.into_split();
            let mut reader = FrameReader(read_half);
            let mut writer = FrameWriter(write_half);

            for (response, delay) in responses {
                let Ok(request) = reader.read_message().await else {
                    return;
                };
                log.lock()
                    .await
                    .push(String::from_utf8(request).unwrap());
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                if writer.write_message(response.as_bytes()).await.is_err() {
                    return;
                }
            }
        });

        Self { port, requests }
    }

    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    pub(crate) async fn connect(&self) -> Arc<Mutex<EngineConnection>> {
        Arc::new(Mutex::new(
            tcp::connect("127.0.0.1", self.port).await.unwrap(),
        ))
    }

    /// Requests received so far, as JSON text
    pub(crate) async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}
