//! Construction-time settings for wire buffers.

/// Settings applied when a [`WireBuffer`](super::WireBuffer) is created.
///
/// Passed explicitly to [`WireBuffer::with_config`](super::WireBuffer::with_config);
/// there is no process-wide default to mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    /// Bytes reserved up front before the first append.
    pub initial_capacity: usize,
}

impl BufferConfig {
    /// Config reserving `initial_capacity` bytes.
    #[must_use]
    pub const fn with_initial_capacity(initial_capacity: usize) -> Self {
        Self { initial_capacity }
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: super::DEFAULT_INITIAL_CAPACITY,
        }
    }
}
