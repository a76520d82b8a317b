//! Wire buffer error types

use thiserror::Error;

/// Wire buffer errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Read past the end of the buffer
    #[error("read out of range: {width} bytes at position {position}, buffer holds {len}")]
    OutOfRange {
        /// Requested start position
        position: usize,
        /// Width of the value being read
        width: usize,
        /// Buffer length at the time of the read
        len: usize,
    },

    /// Front removal larger than the buffer
    #[error("cannot remove {requested} bytes from the front, buffer holds {len}")]
    OverRemoval {
        /// Number of bytes the caller asked to remove
        requested: usize,
        /// Buffer length at the time of the call
        len: usize,
    },

    /// Byte count handed to a decoder differs from the kind's width
    #[error("width mismatch: expected {expected} bytes, got {got}")]
    WidthMismatch {
        /// Width of the numeric kind
        expected: usize,
        /// Length of the slice supplied
        got: usize,
    },

    /// Position plus width does not fit in `usize`
    #[error("position {position} + width {width} overflows")]
    PositionOverflow {
        /// Requested start position
        position: usize,
        /// Width of the value being read
        width: usize,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
