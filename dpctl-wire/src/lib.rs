//! # dpctl-wire
//!
//! Wire protocol for the DCP dataplane control channel.
//!
//! This crate provides:
//! - Binary framing with length prefix and CRC32C validation
//! - The type-erased [`message::Message`] trait and wire-name registry
//! - Typed message definitions for the ip, interface and acl surfaces
//! - The dataplane status-code table
//!
//! The correlation engine in `dpctl-client` never touches frames directly;
//! it consumes messages through the stream abstraction the transport
//! implements on top of this crate.

pub mod acl;
pub mod codec;
pub mod control;
pub mod error;
pub mod frame;
pub mod interface;
pub mod ip;
pub mod message;

pub use codec::Decoder;
pub use error::{Status, WireError};
pub use frame::{Frame, FrameFlags, FRAME_HEADER_SIZE, MAGIC};
pub use message::{Message, TypedMessage};

/// Protocol version supported by this implementation.
pub const PROTOCOL_VERSION: u16 = 1;

/// Maximum frame payload size (16 MiB).
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;
