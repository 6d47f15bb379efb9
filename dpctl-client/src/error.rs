//! Client error taxonomy.
//!
//! The engine itself never retries; every variant carries the call phase
//! and enough identity to log and map upstream. [`ClientError::Remote`] is
//! classified by status code, never by message text.

use crate::transport::TransportError;
use dpctl_wire::Status;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport could not produce a stream.
    #[error("open stream: {0}")]
    Connection(#[source] TransportError),

    /// Sending `message` failed.
    #[error("send {message}: {source}")]
    Send {
        message: &'static str,
        #[source]
        source: TransportError,
    },

    /// Receiving a reply failed, including by timeout.
    #[error("receive reply: {0}")]
    Receive(#[source] TransportError),

    /// The reply stream is desynchronized; likely a version mismatch.
    #[error("unexpected message type: got {observed}, expected {expected}")]
    UnexpectedMessage {
        expected: &'static str,
        observed: &'static str,
    },

    /// The dataplane rejected the operation.
    #[error("{message}: {status}")]
    Remote {
        message: &'static str,
        status: Status,
    },

    /// One or more items of a dump failed individually.
    #[error("dump completed with {} item error(s): {}", .errors.len(), format_errors(.errors))]
    Aggregate { errors: Vec<ClientError> },
}

fn format_errors(errors: &[ClientError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ClientError {
    /// The embedded dataplane status, if the failure was a remote rejection.
    pub fn remote_status(&self) -> Option<Status> {
        match self {
            ClientError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
