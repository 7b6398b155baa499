//! Length-prefixed framing over TCP (or any async byte stream)

use crate::transport::{AsyncReader, AsyncWriter, EngineConnection};
use async_trait::async_trait;
use sc2_core::{Result, Sc2Error};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// Largest frame accepted from the engine (64MB)
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Frame reader over any async read half
pub struct FrameReader<R>(pub R);

#[async_trait]
impl<R: AsyncRead + Unpin + Send> AsyncReader for FrameReader<R> {
    async fn read_message(&mut self) -> Result<Vec<u8>> {
        // Read 4-byte length prefix (little-endian)
        let mut len_bytes = [0u8; 4];
        self.0.read_exact(&mut len_bytes).await?;
        let len = u32::from_le_bytes(len_bytes) as usize;

        if len > MAX_FRAME_LEN {
            return Err(Sc2Error::Ipc(format!("Message too large: {} bytes", len)));
        }

        let mut data = vec![0u8; len];
        self.0.read_exact(&mut data).await?;

        Ok(data)
    }
}

/// Frame writer over any async write half
pub struct FrameWriter<W>(pub W);

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> AsyncWriter for FrameWriter<W> {
    async fn write_message(&mut self, data: &[u8]) -> Result<()> {
        if data.len() > MAX_FRAME_LEN {
            return Err(Sc2Error::Ipc(format!(
                "Message too large: {} bytes",
                data.len()
            )));
        }

        let len = (data.len() as u32).to_le_bytes();
        self.0.write_all(&len).await?;
        self.0.write_all(data).await?;
        self.0.flush().await?;

        Ok(())
    }
}

/// Open a framed connection to an engine listening on `host:port`
pub async fn connect(host: &str, port: u16) -> Result<EngineConnection> {
    let stream = TcpStream::connect((host, port)).await?;
    stream.set_nodelay(true)?;
    debug!("Connected to engine at {}:{}", host, port);

    let (read_half, write_half) = stream.into_split();
    Ok(EngineConnection::new(
        FrameReader(read_half),
        FrameWriter(write_half),
    ))
}
