//! Error types shared by the encoder and decoder.

use std::io;

use thiserror::Error;

use crate::Code;

/// Result type for codec operations.
pub type LzwResult<T> = Result<T, LzwError>;

/// Errors surfaced by the codec.
///
/// The encoder can only fail with [`LzwError::Io`]; a full dictionary is
/// normal operation and is handled by resetting, never reported. The decoder
/// additionally rejects malformed code streams.
#[derive(Debug, Error)]
pub enum LzwError {
    /// The decoder read a code beyond the highest one it could know about.
    /// Either the stream is corrupt or the two ends were built with a
    /// different `MAX_WIDTH`.
    #[error("invalid code {code} (largest known code is {max})")]
    InvalidCode {
        /// The offending code value.
        code: Code,
        /// The largest code assigned on the decoder side at that point.
        max: Code,
    },

    /// The input ended in the middle of a code. Trailing zero bits short of
    /// a byte are the encoder's padding and are accepted; anything else
    /// means the stream was truncated.
    #[error("input ended with {bits} bits of an unfinished code")]
    InputUnderrun {
        /// Number of bits left in the accumulator at end of input.
        bits: u32,
    },

    /// An insertion was attempted into a full dictionary. Unreachable on
    /// well-formed streams: both sides reset before this can happen.
    #[error("dictionary overflowed before a reset")]
    DictionaryFull,

    /// The underlying reader or writer failed.
    #[error("stream callback failed: {0}")]
    Io(#[from] io::Error),
}
