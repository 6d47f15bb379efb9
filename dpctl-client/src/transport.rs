//! The stream transport abstraction the correlation engine consumes.
//!
//! A [`Transport`] hands out one [`Stream`] per engine call; streams are
//! never pooled or shared between concurrent calls, so replies on a stream
//! always belong to the requests sent on that same stream.

use async_trait::async_trait;
use dpctl_wire::{Message, WireError};
use std::fmt;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("stream closed by peer")]
    Closed,

    #[error("wire error: {0}")]
    Wire(#[from] WireError),
}

/// One bidirectional message channel, owned by a single call.
#[async_trait]
pub trait Stream: Send + fmt::Debug {
    /// Sends one message.
    async fn send(&mut self, msg: &dyn Message) -> Result<(), TransportError>;

    /// Receives the next message, blocking until one arrives or the
    /// underlying channel fails.
    async fn recv(&mut self) -> Result<Box<dyn Message>, TransportError>;

    /// Releases the channel. Safe to call on failed streams.
    async fn close(&mut self);
}

/// Opens streams to the dataplane.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Opens a fresh stream, bounded by `timeout`.
    async fn open(&self, timeout: Duration) -> Result<Box<dyn Stream>, TransportError>;
}
