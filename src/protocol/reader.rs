//! Sequential decoding over received wire bytes.

use super::value::{WireValue, decode_at};
use super::{Error, Result, WireBuffer};

/// Cursor that decodes values one after another.
///
/// Borrows the bytes instead of removing them, so the same buffer can be
/// walked more than once. A failed read leaves the cursor where it was.
#[derive(Debug, Clone, Copy)]
pub struct WireReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> WireReader<'a> {
    /// Start reading at offset 0 of `bytes`
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Current offset from the start
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Bytes not yet read
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// Whether every byte has been read
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread tail
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.position..]
    }

    /// Decode the next `T` and advance past it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if fewer than `T::WIDTH` bytes remain.
    pub fn read<T: WireValue>(&mut self) -> Result<T> {
        let value = decode_at::<T>(self.bytes, self.position)?;
        self.position += T::WIDTH;
        Ok(value)
    }

    /// Skip `count` bytes without decoding them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if fewer than `count` bytes remain.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        if count > self.remaining() {
            return Err(Error::OutOfRange {
                position: self.position,
                width: count,
                len: self.bytes.len(),
            });
        }
        self.position += count;
        Ok(())
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read()
    }

    /// Read one signed byte
    pub fn read_i8(&mut self) -> Result<i8> {
        self.read()
    }

    /// Read a big-endian `u16`
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read()
    }

    /// Read a big-endian `u32`
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read()
    }

    /// Read a big-endian `i32`
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read()
    }

    /// Read an `f32`
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read()
    }

    /// Read an `f64`
    pub fn read_f64(&mut self) -> Result<f64> {
        self.read()
    }
}

impl<'a> From<&'a WireBuffer> for WireReader<'a> {
    fn from(buffer: &'a WireBuffer) -> Self {
        Self::new(buffer.as_bytes())
    }
}

impl WireBuffer {
    /// Cursor over the current contents
    #[must_use]
    pub fn reader(&self) -> WireReader<'_> {
        WireReader::from(self)
    }
}
