//! Unix-socket transport to the dataplane's DCP endpoint.
//!
//! Every `open` dials a fresh connection; the correlation engine owns one
//! stream per call and never shares it, so no in-stream multiplexing or
//! request ids are needed.

use crate::transport::{Stream, Transport, TransportError};
use async_trait::async_trait;
use dpctl_wire::codec::{self, Decoder};
use dpctl_wire::Message;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

/// Read buffer size for socket reads (8 KiB).
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Connects to the dataplane control socket.
pub struct UnixTransport {
    path: PathBuf,
}

impl UnixTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl Transport for UnixTransport {
    async fn open(&self, timeout: Duration) -> Result<Box<dyn Stream>, TransportError> {
        tracing::debug!(path = %self.path.display(), "connecting to dataplane socket");

        // Race the connect against the deadline.
        let socket = tokio::time::timeout(timeout, UnixStream::connect(&self.path))
            .await
            .map_err(|_| TransportError::ConnectTimeout(timeout))??;

        Ok(Box::new(UnixDcpStream {
            socket,
            decoder: Decoder::new(),
            buf: vec![0u8; READ_BUFFER_SIZE],
        }))
    }
}

#[derive(Debug)]
struct UnixDcpStream {
    socket: UnixStream,
    decoder: Decoder,
    buf: Vec<u8>,
}

#[async_trait]
impl Stream for UnixDcpStream {
    async fn send(&mut self, msg: &dyn Message) -> Result<(), TransportError> {
        let encoded = codec::encode_message(msg)?;
        self.socket.write_all(&encoded).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<Box<dyn Message>, TransportError> {
        loop {
            if let Some(msg) = self.decoder.decode_message()? {
                return Ok(msg);
            }

            let n = self.socket.read(&mut self.buf).await?;
            if n == 0 {
                return Err(TransportError::Closed);
            }
            self.decoder.extend(&self.buf[..n]);
        }
    }

    async fn close(&mut self) {
        let _ = self.socket.shutdown().await;
    }
}
