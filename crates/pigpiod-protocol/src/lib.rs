//! Wire framing and request/response types for the pigpio daemon socket
//! protocol.
//!
//! The daemon speaks a fixed-header binary protocol over TCP, little-endian
//! throughout:
//!
//! ```text
//! request:   +---------+--------+--------+---------+-----------------+
//!            | command |   p1   |   p2   | ext len | extension bytes |
//!            |  (4 LE) | (4 LE) | (4 LE) |  (4 LE) |   (ext len)     |
//!            +---------+--------+--------+---------+-----------------+
//!
//! response:  +---------+--------+--------+-----------------+
//!            | command |   p1   | status | extension bytes |
//!            |  (4 LE) | (4 LE) | (4 LE) |    (status)     |
//!            +---------+--------+--------+-----------------+
//! ```
//!
//! The response echoes the request's command and p1. A negative `status`
//! signals failure; a non-negative `status` is either the result value of a
//! simple command (a handle, a pulse width) or, when the request declared a
//! reply format, the byte length of the trailing extension payload.
//!
//! # Example
//!
//! ```rust
//! use pigpiod_protocol::{encode_request, Command, Request};
//!
//! let request = Request::simple(Command::Servo, 14, 1500);
//! let bytes = encode_request(&request);
//! assert_eq!(bytes.len(), 16);
//! ```

mod bitmap;
mod command;
mod error;
mod framing;
pub mod status;
mod types;

pub use bitmap::Bitmap;
pub use command::Command;
pub use error::{ProtocolError, ProtocolResult};
pub use framing::{
    decode_header, decode_response, encode_request, FrameReader, FrameWriter, ResponseHeader,
    REQUEST_HEADER_SIZE, RESPONSE_HEADER_SIZE,
};
pub use status::{cause, failure_message};
pub use types::{ElementKind, Extension, Request, Response};
