//! Session control and system messages.

use crate::error::Status;
use serde::{Deserialize, Serialize};

/// Probe message used to bound variable-length reply streams.
///
/// Sent immediately after a dump request; the dataplane echoes a
/// [`ControlPingReply`] after the last detail message, marking the end of
/// the stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlPing {}

/// Reply to [`ControlPing`]; the dump-termination sentinel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlPingReply {
    pub retval: Status,
}

/// Requests the dataplane build information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShowVersion {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShowVersionReply {
    pub retval: Status,
    pub program: String,
    pub version: String,
    pub build_date: String,
    pub build_directory: String,
}
