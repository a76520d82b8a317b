//! Wirebuf - big-endian wire buffer for client-server game protocol messages
//!
//! A [`WireBuffer`] is the byte payload of one message: the sender appends
//! fixed-width integers and IEEE-754 floats in network byte order, the
//! receiver wraps the bytes it got and reads them back at absolute offsets.
//! The buffer knows widths and encodings, never what a field means.
//!
//! # Quick Start
//!
//! ```rust
//! use wirebuf::WireBuffer;
//!
//! // Build a message
//! let mut msg = WireBuffer::new();
//! msg.append_u8(0x10).append_i32(-42).append_f32(0.5);
//!
//! // Hand `msg.as_bytes()` to a transport, then on the other side:
//! let mut received = WireBuffer::from_bytes(msg.as_bytes());
//! let kind = received.consume::<u8>()?;
//! assert_eq!(kind, 0x10);
//! assert_eq!(received.read_i32(0)?, -42);
//! assert_eq!(received.read_f32(4)?, 0.5);
//! # Ok::<(), wirebuf::Error>(())
//! ```
//!
//! # Wire Layout
//!
//! - Multi-byte integers: big-endian
//! - `i32`: two's complement, same bytes as the `u32` with that bit pattern
//! - `f32` / `f64`: IEEE-754 bits, most-significant byte first
//! - No length prefix, framing, or checksum
//!
//! Reads past the end fail with [`Error::OutOfRange`] instead of returning
//! garbage.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;

pub use protocol::{
    BufferConfig, Error, Result, WireBuffer, WireReader, WireValue, concat, decode_at, hexdump,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
