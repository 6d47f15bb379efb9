//! Scripted in-memory transport for tests.
//!
//! Each [`MockScript`] describes one stream: the replies it will produce,
//! in order, and whether opening or sending on it should fail. Sent
//! messages and open/close counts are recorded on the transport so tests
//! can assert the engine's stream discipline.

use crate::transport::{Stream, Transport, TransportError};
use async_trait::async_trait;
use dpctl_wire::Message;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
enum MockReply {
    Message(Box<dyn Message>),
    Closed,
    Hang,
}

/// Script for a single stream handed out by [`MockTransport`].
#[derive(Debug, Default)]
pub struct MockScript {
    fail_open: bool,
    fail_send: bool,
    replies: VecDeque<MockReply>,
}

impl MockScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply message.
    pub fn reply(mut self, msg: impl Message) -> Self {
        self.replies.push_back(MockReply::Message(Box::new(msg)));
        self
    }

    /// Queues a peer-closed failure.
    pub fn reply_closed(mut self) -> Self {
        self.replies.push_back(MockReply::Closed);
        self
    }

    /// Makes the next receive block forever, for deadline tests.
    pub fn hang(mut self) -> Self {
        self.replies.push_back(MockReply::Hang);
        self
    }

    /// Makes `open` fail for this script.
    pub fn fail_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Makes every send on this stream fail.
    pub fn fail_send(mut self) -> Self {
        self.fail_send = true;
        self
    }
}

#[derive(Debug, Default)]
struct MockInner {
    scripts: Mutex<VecDeque<MockScript>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
    sent: Mutex<Vec<(String, Value)>>,
}

/// Transport whose streams replay pre-scripted replies.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<MockInner>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the script for the next opened stream.
    pub fn push_script(&self, script: MockScript) {
        self.inner.scripts.lock().push_back(script);
    }

    /// Number of successfully opened streams.
    pub fn opened(&self) -> usize {
        self.inner.opened.load(Ordering::SeqCst)
    }

    /// Number of closed streams.
    pub fn closed(&self) -> usize {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Every message sent on any stream, in order: (wire name, body).
    pub fn sent(&self) -> Vec<(String, Value)> {
        self.inner.sent.lock().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn open(&self, _timeout: Duration) -> Result<Box<dyn Stream>, TransportError> {
        let script = self
            .inner
            .scripts
            .lock()
            .pop_front()
            .unwrap_or_default();

        if script.fail_open {
            return Err(TransportError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "scripted open failure",
            )));
        }

        self.inner.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockStream {
            script,
            inner: self.inner.clone(),
        }))
    }
}

#[derive(Debug)]
struct MockStream {
    script: MockScript,
    inner: Arc<MockInner>,
}

#[async_trait]
impl Stream for MockStream {
    async fn send(&mut self, msg: &dyn Message) -> Result<(), TransportError> {
        if self.script.fail_send {
            return Err(TransportError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "scripted send failure",
            )));
        }
        let body = msg.body()?;
        self.inner
            .sent
            .lock()
            .push((msg.name().to_string(), body));
        Ok(())
    }

    async fn recv(&mut self) -> Result<Box<dyn Message>, TransportError> {
        match self.script.replies.pop_front() {
            Some(MockReply::Message(msg)) => Ok(msg),
            Some(MockReply::Closed) | None => Err(TransportError::Closed),
            Some(MockReply::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }

    async fn close(&mut self) {
        self.inner.closed.fetch_add(1, Ordering::SeqCst);
    }
}
