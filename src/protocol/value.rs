//! Numeric kinds that can travel on the wire
//!
//! Every kind has a fixed width and a big-endian byte layout. Integers are
//! written most-significant byte first, signed integers use their
//! two's-complement bit pattern, floats use their IEEE-754 bit pattern
//! pushed through the same integer routine. Nothing here depends on host
//! byte order.

use bytes::{BufMut, BytesMut};
use tracing::debug;

use super::{Error, F64_WIDTH, Result, U8_WIDTH, U16_WIDTH, U32_WIDTH};

/// A fixed-width numeric kind with a big-endian wire encoding.
///
/// Implemented for `u8`, `i8`, `u16`, `u32`, `i32`, `f32` and `f64`; the
/// trait is sealed.
pub trait WireValue: sealed::Sealed + Copy {
    /// Number of bytes the value occupies on the wire.
    const WIDTH: usize;

    /// Append the big-endian bytes of `self` to `dst`.
    fn encode(self, dst: &mut BytesMut) {
        put_be(dst, self.to_wire_bits(), Self::WIDTH);
    }

    /// Rebuild a value from exactly [`Self::WIDTH`] bytes.
    ///
    /// Use [`decode_at`] to read from a position inside a larger message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WidthMismatch`] if `src.len() != Self::WIDTH`.
    fn decode(src: &[u8]) -> Result<Self> {
        if src.len() != Self::WIDTH {
            return Err(Error::WidthMismatch {
                expected: Self::WIDTH,
                got: src.len(),
            });
        }
        Ok(Self::from_wire_bits(get_be(src)))
    }
}

mod sealed {
    /// Bit-pattern view shared by every wire kind. Only the low `WIDTH`
    /// bytes are meaningful.
    pub trait Sealed: Sized {
        fn to_wire_bits(self) -> u64;
        fn from_wire_bits(bits: u64) -> Self;
    }
}

/// Write the low `width` bytes of `bits`, most-significant first.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn put_be(dst: &mut BytesMut, bits: u64, width: usize) {
    for index in (0..width).rev() {
        dst.put_u8(((bits >> (index * 8)) & 0xff) as u8);
    }
}

/// Accumulate bytes from most- to least-significant.
#[inline]
fn get_be(src: &[u8]) -> u64 {
    src.iter()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte & 0xff))
}

impl WireValue for u8 {
    const WIDTH: usize = U8_WIDTH;
}

impl sealed::Sealed for u8 {
    fn to_wire_bits(self) -> u64 {
        u64::from(self)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_wire_bits(bits: u64) -> Self {
        bits as u8
    }
}

impl WireValue for i8 {
    const WIDTH: usize = U8_WIDTH;
}

impl sealed::Sealed for i8 {
    #[allow(clippy::cast_sign_loss)]
    fn to_wire_bits(self) -> u64 {
        u64::from(self as u8)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn from_wire_bits(bits: u64) -> Self {
        bits as u8 as i8
    }
}

impl WireValue for u16 {
    const WIDTH: usize = U16_WIDTH;
}

impl sealed::Sealed for u16 {
    fn to_wire_bits(self) -> u64 {
        u64::from(self)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_wire_bits(bits: u64) -> Self {
        bits as u16
    }
}

impl WireValue for u32 {
    const WIDTH: usize = U32_WIDTH;
}

impl sealed::Sealed for u32 {
    fn to_wire_bits(self) -> u64 {
        u64::from(self)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_wire_bits(bits: u64) -> Self {
        bits as u32
    }
}

// Same bytes as the u32 carrying the same bit pattern.
impl WireValue for i32 {
    const WIDTH: usize = U32_WIDTH;
}

impl sealed::Sealed for i32 {
    #[allow(clippy::cast_sign_loss)]
    fn to_wire_bits(self) -> u64 {
        u64::from(self as u32)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn from_wire_bits(bits: u64) -> Self {
        bits as u32 as i32
    }
}

impl WireValue for f32 {
    const WIDTH: usize = U32_WIDTH;
}

impl sealed::Sealed for f32 {
    fn to_wire_bits(self) -> u64 {
        u64::from(self.to_bits())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_wire_bits(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }
}

impl WireValue for f64 {
    const WIDTH: usize = F64_WIDTH;
}

impl sealed::Sealed for f64 {
    fn to_wire_bits(self) -> u64 {
        self.to_bits()
    }

    fn from_wire_bits(bits: u64) -> Self {
        f64::from_bits(bits)
    }
}

/// Decode a `T` from `bytes` starting at `position`.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] when fewer than `T::WIDTH` bytes remain at
/// `position`, and [`Error::PositionOverflow`] when `position + T::WIDTH`
/// does not fit in `usize`.
pub fn decode_at<T: WireValue>(bytes: &[u8], position: usize) -> Result<T> {
    let width = T::WIDTH;
    let Some(end) = position.checked_add(width) else {
        debug!(position, width, "wire read position overflows");
        return Err(Error::PositionOverflow { position, width });
    };

    match bytes.get(position..end) {
        Some(slice) => T::decode(slice),
        None => {
            let len = bytes.len();
            debug!(position, width, len, "wire read out of range");
            Err(Error::OutOfRange {
                position,
                width,
                len,
            })
        }
    }
}
