//! Wire buffer core
//!
//! This module provides the byte container, the numeric wire encodings, and
//! a cursor for sequential decoding.

mod buffer;
mod config;
mod error;
mod hexdump;
mod reader;
mod value;

pub use buffer::{WireBuffer, concat};
pub use config::BufferConfig;
pub use error::{Error, Result};
pub use hexdump::hexdump;
pub use reader::WireReader;
pub use value::{WireValue, decode_at};

/// Width of an 8-bit value in bytes
pub const U8_WIDTH: usize = 1;

/// Width of a 16-bit value in bytes
pub const U16_WIDTH: usize = 2;

/// Width of a 32-bit integer or single-precision float in bytes
pub const U32_WIDTH: usize = 4;

/// Width of a double-precision float in bytes
pub const F64_WIDTH: usize = 8;

/// Capacity reserved by [`BufferConfig::default`]
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;
