//! Growable wire buffer with typed append and positional read
//!
//! A [`WireBuffer`] is the byte payload of one protocol message. The sender
//! chains `append_*` calls and hands [`WireBuffer::as_bytes`] to its transport;
//! the receiver wraps what arrived and decodes with `read_*` at absolute
//! offsets, optionally dropping consumed bytes with [`WireBuffer::remove_front`].
//!
//! ```rust
//! use wirebuf::WireBuffer;
//!
//! let mut msg = WireBuffer::new();
//! msg.append_u8(1).append_u16(300).append_u32(70_000);
//! assert_eq!(msg.as_bytes(), &[0x01, 0x01, 0x2C, 0x00, 0x01, 0x11, 0x70]);
//!
//! let received = WireBuffer::from_bytes(msg.as_bytes());
//! assert_eq!(received.read_u16(1)?, 300);
//! assert_eq!(received.read_u32(3)?, 70_000);
//! # Ok::<(), wirebuf::Error>(())
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Index};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

use super::value::{WireValue, decode_at};
use super::hexdump::HexBytes;
use super::{BufferConfig, Error, Result};

/// Ordered, growable sequence of wire bytes.
///
/// Appends only ever add to the back. The only way bytes disappear is
/// [`remove_front`](Self::remove_front). Cloning copies the bytes.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireBuffer {
    inner: BytesMut,
}

impl WireBuffer {
    /// Create an empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` bytes
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: BytesMut::with_capacity(capacity),
        }
    }

    /// Create an empty buffer from explicit settings
    #[must_use]
    pub fn with_config(config: BufferConfig) -> Self {
        Self::with_capacity(config.initial_capacity)
    }

    /// Create a one-byte buffer
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        let mut inner = BytesMut::with_capacity(1);
        inner.put_u8(byte);
        Self { inner }
    }

    /// Wrap a copy of `raw` verbatim
    #[must_use]
    pub fn from_bytes(raw: &[u8]) -> Self {
        Self {
            inner: BytesMut::from(raw),
        }
    }

    /// Number of bytes currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check whether the buffer holds no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Bytes that can be appended before the storage reallocates
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Raw bytes for handing to a transport
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Convert into an immutable, cheaply clonable [`Bytes`]
    #[must_use]
    pub fn freeze(self) -> Bytes {
        self.inner.freeze()
    }

    /// Convert into a `Vec<u8>`
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        Vec::from(self.inner.freeze())
    }

    /// Append any [`WireValue`]
    pub fn append<T: WireValue>(&mut self, value: T) -> &mut Self {
        self.inner.reserve(T::WIDTH);
        value.encode(&mut self.inner);
        self
    }

    /// Append one raw byte
    pub fn append_u8(&mut self, value: u8) -> &mut Self {
        self.append(value)
    }

    /// Append a signed byte
    pub fn append_i8(&mut self, value: i8) -> &mut Self {
        self.append(value)
    }

    /// Append a big-endian `u16`
    pub fn append_u16(&mut self, value: u16) -> &mut Self {
        self.append(value)
    }

    /// Append a big-endian `u32`
    pub fn append_u32(&mut self, value: u32) -> &mut Self {
        self.append(value)
    }

    /// Append a big-endian two's-complement `i32`
    pub fn append_i32(&mut self, value: i32) -> &mut Self {
        self.append(value)
    }

    /// Append an IEEE-754 single, most-significant byte first
    pub fn append_f32(&mut self, value: f32) -> &mut Self {
        self.append(value)
    }

    /// Append an IEEE-754 double, most-significant byte first
    pub fn append_f64(&mut self, value: f64) -> &mut Self {
        self.append(value)
    }

    /// Append raw bytes verbatim
    pub fn append_bytes(&mut self, raw: &[u8]) -> &mut Self {
        self.inner.extend_from_slice(raw);
        self
    }

    /// Append the bytes of another buffer
    pub fn append_buffer(&mut self, other: &WireBuffer) -> &mut Self {
        self.append_bytes(other.as_bytes())
    }

    /// Decode a `T` at `position` without consuming anything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `position + T::WIDTH > self.len()`.
    pub fn read<T: WireValue>(&self, position: usize) -> Result<T> {
        decode_at(&self.inner, position)
    }

    /// Read one byte
    pub fn read_u8(&self, position: usize) -> Result<u8> {
        self.read(position)
    }

    /// Read one signed byte
    pub fn read_i8(&self, position: usize) -> Result<i8> {
        self.read(position)
    }

    /// Read a big-endian `u16`
    pub fn read_u16(&self, position: usize) -> Result<u16> {
        self.read(position)
    }

    /// Read a big-endian `u32`
    pub fn read_u32(&self, position: usize) -> Result<u32> {
        self.read(position)
    }

    /// Read a big-endian `i32`
    pub fn read_i32(&self, position: usize) -> Result<i32> {
        self.read(position)
    }

    /// Read an `f32`
    pub fn read_f32(&self, position: usize) -> Result<f32> {
        self.read(position)
    }

    /// Read an `f64`
    pub fn read_f64(&self, position: usize) -> Result<f64> {
        self.read(position)
    }

    /// Byte at `position`, or `None` past the end
    #[must_use]
    pub fn get(&self, position: usize) -> Option<u8> {
        self.inner.get(position).copied()
    }

    /// Drop the first `count` bytes.
    ///
    /// Afterwards a read at `p` sees what was at `p + count` before.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OverRemoval`] if `count > self.len()`; the buffer is
    /// left unchanged.
    pub fn remove_front(&mut self, count: usize) -> Result<&mut Self> {
        let len = self.inner.len();
        if count > len {
            debug!(requested = count, len, "front removal exceeds buffer");
            return Err(Error::OverRemoval {
                requested: count,
                len,
            });
        }

        self.inner.advance(count);
        trace!(removed = count, remaining = self.inner.len(), "consumed front");
        Ok(self)
    }

    /// Decode a `T` at the front and remove its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if fewer than `T::WIDTH` bytes remain;
    /// nothing is removed in that case.
    pub fn consume<T: WireValue>(&mut self) -> Result<T> {
        let value = self.read::<T>(0)?;
        self.inner.advance(T::WIDTH);
        Ok(value)
    }
}

/// New buffer holding `a` followed by `b`. Neither operand changes.
#[must_use]
pub fn concat(a: &WireBuffer, b: &WireBuffer) -> WireBuffer {
    let mut out = WireBuffer::with_capacity(a.len() + b.len());
    out.append_buffer(a).append_buffer(b);
    trace!(left = a.len(), right = b.len(), "concatenated buffers");
    out
}

impl Add for &WireBuffer {
    type Output = WireBuffer;

    fn add(self, rhs: Self) -> WireBuffer {
        concat(self, rhs)
    }
}

impl<'a> Add<&'a WireBuffer> for WireBuffer {
    type Output = WireBuffer;

    fn add(mut self, rhs: &'a WireBuffer) -> WireBuffer {
        self.append_buffer(rhs);
        self
    }
}

impl Add for WireBuffer {
    type Output = WireBuffer;

    fn add(self, rhs: WireBuffer) -> WireBuffer {
        self + &rhs
    }
}

impl<'a> AddAssign<&'a WireBuffer> for WireBuffer {
    fn add_assign(&mut self, rhs: &'a WireBuffer) {
        self.append_buffer(rhs);
    }
}

impl AddAssign for WireBuffer {
    fn add_assign(&mut self, rhs: WireBuffer) {
        self.append_buffer(&rhs);
    }
}

/// Unchecked byte access; panics past the end like slice indexing.
impl Index<usize> for WireBuffer {
    type Output = u8;

    fn index(&self, position: usize) -> &u8 {
        &self.inner[position]
    }
}

impl AsRef<[u8]> for WireBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<u8> for WireBuffer {
    fn from(byte: u8) -> Self {
        Self::from_byte(byte)
    }
}

impl From<&[u8]> for WireBuffer {
    fn from(raw: &[u8]) -> Self {
        Self::from_bytes(raw)
    }
}

impl From<Vec<u8>> for WireBuffer {
    fn from(raw: Vec<u8>) -> Self {
        Self::from(Bytes::from(raw))
    }
}

impl From<Bytes> for WireBuffer {
    fn from(raw: Bytes) -> Self {
        Self {
            inner: BytesMut::from(raw),
        }
    }
}

impl From<BytesMut> for WireBuffer {
    fn from(inner: BytesMut) -> Self {
        Self { inner }
    }
}

impl From<WireBuffer> for Bytes {
    fn from(buffer: WireBuffer) -> Self {
        buffer.freeze()
    }
}

impl Extend<u8> for WireBuffer {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}

impl<'a> Extend<&'a u8> for WireBuffer {
    fn extend<I: IntoIterator<Item = &'a u8>>(&mut self, iter: I) {
        self.inner.extend(iter.into_iter().copied());
    }
}

impl FromIterator<u8> for WireBuffer {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for WireBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireBuffer")
            .field("len", &self.inner.len())
            .field("bytes", &format_args!("[{}]", HexBytes(&self.inner)))
            .finish()
    }
}

impl fmt::LowerHex for WireBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::hexdump::write_hex(f, &self.inner, false)
    }
}

impl fmt::UpperHex for WireBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::hexdump::write_hex(f, &self.inner, true)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use std::fmt;

    use bytes::{BufMut, BytesMut};
    use serde::de::{self, SeqAccess, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::WireBuffer;

    // Upper bound on capacity reserved from an untrusted length hint.
    const MAX_PREALLOC: usize = 4096;

    impl Serialize for WireBuffer {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_bytes(self.as_bytes())
        }
    }

    struct WireBufferVisitor;

    impl<'de> Visitor<'de> for WireBufferVisitor {
        type Value = WireBuffer;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a byte string or a sequence of bytes")
        }

        fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<WireBuffer, E> {
            Ok(WireBuffer::from_bytes(v))
        }

        fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<WireBuffer, E> {
            Ok(WireBuffer::from(v))
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<WireBuffer, A::Error> {
            let hint = seq.size_hint().unwrap_or(0).min(MAX_PREALLOC);
            let mut inner = BytesMut::with_capacity(hint);
            while let Some(byte) = seq.next_element::<u8>()? {
                inner.put_u8(byte);
            }
            Ok(WireBuffer::from(inner))
        }
    }

    impl<'de> Deserialize<'de> for WireBuffer {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_byte_buf(WireBufferVisitor)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WireBuffer {
        let mut buf = WireBuffer::new();
        buf.append_u8(1).append_u16(300).append_u32(70_000);
        buf
    }

    #[test]
    fn test_construction() {
        assert_eq!(WireBuffer::new().len(), 0);
        assert!(WireBuffer::new().is_empty());

        let one = WireBuffer::from_byte(0xAB);
        assert_eq!(one.as_bytes(), &[0xAB]);

        let wrapped = WireBuffer::from_bytes(&[1, 2, 3]);
        assert_eq!(wrapped.as_bytes(), &[1, 2, 3]);

        let configured = WireBuffer::with_config(BufferConfig::with_initial_capacity(128));
        assert!(configured.is_empty());
        assert!(configured.capacity() >= 128);
    }

    #[test]
    fn test_clone_does_not_alias() {
        let original = sample();
        let mut copy = original.clone();
        copy.append_u8(9);
        assert_eq!(original.len(), 7);
        assert_eq!(copy.len(), 8);
    }

    #[test]
    fn test_mixed_append_layout() {
        let buf = sample();
        assert_eq!(buf.as_bytes(), &[0x01, 0x01, 0x2C, 0x00, 0x01, 0x11, 0x70]);
        assert_eq!(buf.len(), 7);
        assert_eq!(buf.read_u8(0), Ok(1));
        assert_eq!(buf.read_u16(1), Ok(300));
        assert_eq!(buf.read_u32(3), Ok(70_000));
        assert_eq!(buf[1], 0x01);
        assert_eq!(buf.get(2), Some(0x2C));
        assert_eq!(buf.get(7), None);
    }

    #[test]
    fn test_integer_extremes() {
        let mut buf = WireBuffer::new();
        buf.append_u32(u32::MAX)
            .append_i32(i32::MIN)
            .append_i32(i32::MAX)
            .append_u16(u16::MAX)
            .append_i8(i8::MIN);

        assert_eq!(buf.read_u32(0), Ok(4_294_967_295));
        assert_eq!(buf.read_i32(4), Ok(-2_147_483_648));
        assert_eq!(buf.read_i32(8), Ok(i32::MAX));
        assert_eq!(buf.read_u16(12), Ok(u16::MAX));
        assert_eq!(buf.read_i8(14), Ok(i8::MIN));
    }

    #[test]
    fn test_float_bits_preserved() {
        let mut buf = WireBuffer::new();
        buf.append_f32(-0.0)
            .append_f64(f64::INFINITY)
            .append_f32(f32::from_bits(0x7F80_0001));

        assert_eq!(buf.read_f32(0).unwrap().to_bits(), (-0.0f32).to_bits());
        assert_eq!(buf.read_f64(4).unwrap(), f64::INFINITY);
        assert_eq!(buf.read_f32(12).unwrap().to_bits(), 0x7F80_0001);
    }

    #[test]
    fn test_read_out_of_range() {
        let buf = sample();
        assert_eq!(
            buf.read_u8(7),
            Err(Error::OutOfRange {
                position: 7,
                width: 1,
                len: 7,
            })
        );
        assert!(buf.read_u32(4).is_err());
        assert!(buf.read_f64(0).is_err());
        assert!(WireBuffer::new().read_u8(0).is_err());
    }

    #[test]
    #[should_panic]
    fn test_index_past_end_panics() {
        let buf = WireBuffer::from_byte(1);
        let _byte = buf[1];
    }

    #[test]
    fn test_remove_front_shifts_positions() {
        let mut buf = sample();
        let before = buf.read_u32(3).unwrap();
        buf.remove_front(3).unwrap();
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.read_u32(0), Ok(before));

        buf.remove_front(4).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_remove_front_too_many() {
        let mut buf = sample();
        let result = buf.remove_front(8);
        assert_eq!(
            result.map(|b| b.len()),
            Err(Error::OverRemoval {
                requested: 8,
                len: 7,
            })
        );
        assert_eq!(buf, sample());
    }

    #[test]
    fn test_consume() {
        let mut buf = sample();
        assert_eq!(buf.consume::<u8>(), Ok(1));
        assert_eq!(buf.consume::<u16>(), Ok(300));
        assert!(buf.consume::<f64>().is_err());
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.consume::<u32>(), Ok(70_000));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_concat_leaves_operands() {
        let a = WireBuffer::from_byte(0xFF);
        let b = WireBuffer::from_byte(0x01);
        let joined = &a + &b;

        assert_eq!(joined.len(), 2);
        assert_eq!(joined.as_bytes(), &[0xFF, 0x01]);
        assert_eq!(a.as_bytes(), &[0xFF]);
        assert_eq!(b.as_bytes(), &[0x01]);
        assert_eq!(concat(&a, &b), joined);
        assert_eq!(a.clone() + b.clone(), joined);
    }

    #[test]
    fn test_add_assign() {
        let mut a = WireBuffer::from_byte(0xFF);
        let b = sample();
        a += &b;
        assert_eq!(a.len(), 8);
        assert_eq!(a.read_u16(2), Ok(300));
        a += WireBuffer::from_byte(7);
        assert_eq!(a[8], 7);
    }

    #[test]
    fn test_conversions() {
        let from_vec = WireBuffer::from(vec![1u8, 2, 3]);
        let from_bytes = WireBuffer::from(Bytes::from_static(&[1, 2, 3]));
        let collected: WireBuffer = [1u8, 2, 3].into_iter().collect();
        assert_eq!(from_vec, from_bytes);
        assert_eq!(from_vec, collected);
        assert_eq!(from_vec.clone().into_vec(), vec![1, 2, 3]);
        assert_eq!(Bytes::from(from_vec), Bytes::from_static(&[1, 2, 3]));

        let mut extended = WireBuffer::from(0u8);
        extended.extend([1u8, 2]);
        extended.extend(&[3u8]);
        assert_eq!(extended.as_ref(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_formatting() {
        let buf = WireBuffer::from_bytes(&[0x01, 0xAB]);
        assert_eq!(format!("{buf:x}"), "01 ab");
        assert_eq!(format!("{buf:X}"), "01 AB");
        assert_eq!(
            format!("{buf:?}"),
            "WireBuffer { len: 2, bytes: [01 ab] }"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_json() {
        let buf = sample();
        let json = serde_json::to_string(&buf).unwrap();
        assert_eq!(json, "[1,1,44,0,1,17,112]");
        let back: WireBuffer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, buf);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every value reads back from offset 0
            #[test]
            fn prop_scalar_roundtrip(
                a in any::<u8>(),
                b in any::<u16>(),
                c in any::<u32>(),
                d in any::<i32>(),
                e in any::<i8>(),
            ) {
                prop_assert_eq!(WireBuffer::new().append_u8(a).read_u8(0), Ok(a));
                prop_assert_eq!(WireBuffer::new().append_u16(b).read_u16(0), Ok(b));
                prop_assert_eq!(WireBuffer::new().append_u32(c).read_u32(0), Ok(c));
                prop_assert_eq!(WireBuffer::new().append_i32(d).read_i32(0), Ok(d));
                prop_assert_eq!(WireBuffer::new().append_i8(e).read_i8(0), Ok(e));
            }

            /// Property: floats round-trip bit for bit, NaNs included
            #[test]
            fn prop_float_bits_roundtrip(single in any::<u32>(), double in any::<u64>()) {
                let mut buf = WireBuffer::new();
                buf.append_f32(f32::from_bits(single)).append_f64(f64::from_bits(double));
                prop_assert_eq!(buf.read_f32(0).unwrap().to_bits(), single);
                prop_assert_eq!(buf.read_f64(4).unwrap().to_bits(), double);
            }

            /// Property: a second value sits right after the first
            #[test]
            fn prop_order_preserved(first in any::<u16>(), second in any::<f64>()) {
                let mut buf = WireBuffer::new();
                buf.append_u16(first).append_f64(second);
                prop_assert_eq!(buf.len(), 10);
                prop_assert_eq!(buf.read_u16(0), Ok(first));
                prop_assert_eq!(buf.read_f64(2).unwrap().to_bits(), second.to_bits());
            }

            /// Property: concatenation is byte-wise append and pure
            #[test]
            fn prop_concat_identity(
                left in prop::collection::vec(any::<u8>(), 0..256),
                right in prop::collection::vec(any::<u8>(), 0..256),
            ) {
                let a = WireBuffer::from(left.clone());
                let b = WireBuffer::from(right.clone());
                let joined = &a + &b;

                let mut expected = left.clone();
                expected.extend_from_slice(&right);
                prop_assert_eq!(joined.as_bytes(), expected.as_slice());
                prop_assert_eq!(joined.len(), a.len() + b.len());
                prop_assert_eq!(a.as_bytes(), left.as_slice());
                prop_assert_eq!(b.as_bytes(), right.as_slice());
            }

            /// Property: removal shifts every later read down by n
            #[test]
            fn prop_remove_front_consistency(
                data in prop::collection::vec(any::<u8>(), 0..256),
                cut in 0usize..300,
                probe in 0usize..300,
            ) {
                let mut buf = WireBuffer::from(data.clone());
                let before = buf.read_u16(probe.saturating_add(cut));
                let len = buf.len();

                let outcome = buf.remove_front(cut).map(|_| ());
                match outcome {
                    Ok(()) => {
                        prop_assert!(cut <= len);
                        prop_assert_eq!(buf.len(), len - cut);
                        prop_assert_eq!(buf.read_u16(probe).ok(), before.ok());
                    }
                    Err(err) => {
                        prop_assert!(cut > len);
                        prop_assert_eq!(err, Error::OverRemoval { requested: cut, len });
                        prop_assert_eq!(buf.as_bytes(), data.as_slice());
                    }
                }
            }
        }
    }
}
