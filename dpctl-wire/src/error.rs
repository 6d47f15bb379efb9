//! Wire errors and the dataplane status-code table.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while framing or (de)serializing DCP messages.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("invalid magic bytes: expected 'DCP1', got {0:?}")]
    InvalidMagic([u8; 4]),

    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u16),

    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: u32, max: u32 },

    #[error("CRC mismatch: expected {expected:#x}, got {actual:#x}")]
    CrcMismatch { expected: u32, actual: u32 },

    #[error("invalid frame flags: {0:#x}")]
    InvalidFlags(u16),

    #[error("unknown message name: {0}")]
    UnknownMessage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid UTF-8 in payload")]
    InvalidUtf8,
}

/// Scalar status code embedded in dataplane replies.
///
/// Zero is success; nonzero values are dataplane-defined errors. The named
/// constants below are part of the DCP contract and must remain stable.
/// Callers classify by code, never by message text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(pub i32);

impl Status {
    pub const OK: Status = Status(0);
    pub const UNSPECIFIED: Status = Status(-1);
    pub const INVALID_SW_IF_INDEX: Status = Status(-2);
    pub const NO_SUCH_FIB: Status = Status(-3);
    pub const NO_SUCH_ENTRY: Status = Status(-6);
    pub const INVALID_VALUE: Status = Status(-7);
    pub const ADDRESS_IN_USE: Status = Status(-12);
    pub const ALREADY_EXISTS: Status = Status(-17);
    pub const TABLE_IN_USE: Status = Status(-42);

    pub fn code(&self) -> i32 {
        self.0
    }

    pub fn is_ok(&self) -> bool {
        self.0 == 0
    }

    /// Codes that mean the referenced object does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            *self,
            Status::INVALID_SW_IF_INDEX | Status::NO_SUCH_FIB | Status::NO_SUCH_ENTRY
        )
    }

    /// Codes that mean the object (or address) is already present.
    pub fn is_already_exists(&self) -> bool {
        matches!(*self, Status::ADDRESS_IN_USE | Status::ALREADY_EXISTS)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Status::OK => "OK",
            Status::UNSPECIFIED => "UNSPECIFIED",
            Status::INVALID_SW_IF_INDEX => "INVALID_SW_IF_INDEX",
            Status::NO_SUCH_FIB => "NO_SUCH_FIB",
            Status::NO_SUCH_ENTRY => "NO_SUCH_ENTRY",
            Status::INVALID_VALUE => "INVALID_VALUE",
            Status::ADDRESS_IN_USE => "ADDRESS_IN_USE",
            Status::ALREADY_EXISTS => "ALREADY_EXISTS",
            Status::TABLE_IN_USE => "TABLE_IN_USE",
            Status(code) => return write!(f, "status {code}"),
        };
        write!(f, "{name} ({})", self.0)
    }
}
