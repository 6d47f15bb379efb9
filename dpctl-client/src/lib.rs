//! # dpctl-client
//!
//! Dataplane client for dpctl.
//!
//! This crate provides:
//! - The [`transport::Stream`]/[`transport::Transport`] abstraction and a
//!   Unix-socket implementation over the DCP wire codec
//! - The request/reply correlation engine: unary calls, sentinel-bounded
//!   dumps, and raw stream access
//! - The client error taxonomy
//! - A scripted mock transport for tests ([`testing`])

pub mod client;
pub mod error;
pub mod testing;
pub mod transport;
pub mod uds;

pub use client::{recv_within, Client, ClientConfig};
pub use error::ClientError;
pub use transport::{Stream, Transport, TransportError};
pub use uds::UnixTransport;
