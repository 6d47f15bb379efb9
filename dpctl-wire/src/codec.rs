//! Encoding and decoding of messages to and from DCP frames.
//!
//! The frame payload is a JSON envelope `{"msg": <wire name>, "body": {…}}`;
//! decoding dispatches on the wire name through the message registry.

use crate::error::WireError;
use crate::frame::Frame;
use crate::message::{self, Message};
use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize)]
struct Envelope {
    msg: String,
    body: Value,
}

/// Encodes a message into a complete frame, ready for the socket.
pub fn encode_message(msg: &dyn Message) -> Result<BytesMut, WireError> {
    let envelope = Envelope {
        msg: msg.name().to_string(),
        body: msg.body()?,
    };
    let payload = serde_json::to_vec(&envelope)?;
    Frame::new(Bytes::from(payload)).encode()
}

/// Decodes a frame payload into a typed message.
pub fn decode_message(frame: &Frame) -> Result<Box<dyn Message>, WireError> {
    let envelope: Envelope = serde_json::from_slice(&frame.payload)?;
    message::decode_body(&envelope.msg, envelope.body)
}

/// Incremental frame decoder over a byte stream.
#[derive(Debug)]
pub struct Decoder {
    buffer: BytesMut,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(8192),
        }
    }

    /// Appends data to the internal buffer.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Attempts to decode the next frame from the buffer.
    pub fn decode_frame(&mut self) -> Result<Option<Frame>, WireError> {
        Frame::decode(&mut self.buffer)
    }

    /// Attempts to decode the next complete message from the buffer.
    pub fn decode_message(&mut self) -> Result<Option<Box<dyn Message>>, WireError> {
        match self.decode_frame()? {
            Some(frame) => Ok(Some(decode_message(&frame)?)),
            None => Ok(None),
        }
    }

    /// Returns the number of bytes currently buffered.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Clears the internal buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
