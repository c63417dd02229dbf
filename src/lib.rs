//! # Streaming LZW for raw code streams
//!
//! This crate provides an [`Encoder`] and a [`Decoder`] for a bare,
//! header-less LZW stream: a sequence of variable-width codes packed into
//! bytes most significant bit first, with no magic, no length, no checksum
//! and no CLEAR/EOI sentinels. That last point also means the format does
//! not interoperate with the GIF, TIFF or compress(1) flavors of LZW, which
//! all reserve such sentinel codes.
//!
//! The code width starts at 9 bits and grows with the dictionary up to
//! [`MAX_WIDTH`] bits. Once all [`DICT_SIZE`] codes are assigned, both sides
//! discard the dictionary and start over at 9 bits. Nothing on the wire
//! marks the reset; encoder and decoder detect it from the dictionary size
//! alone, so the two state machines have to stay in lockstep code for code.
//!
//! A context serves one stream and is not shareable across threads; separate
//! streams want separate contexts. Output leaves through the
//! [`std::io::Write`] handed to the context at construction. Input is pushed
//! in chunks through [`Encoder::encode`] / [`Decoder::decode`], or drained
//! from a [`std::io::Read`] by the `*_all` drivers.
//!
//! ```
//! use rawlzw::{Decoder, Encoder};
//!
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! let mut encoder = Encoder::new(Vec::new());
//! encoder.encode(data)?;
//! let compressed = encoder.finish()?;
//!
//! let decoded = Decoder::new(Vec::new()).decode_all(&compressed[..])?;
//! assert_eq!(decoded, data);
//! # Ok::<(), rawlzw::LzwError>(())
//! ```

pub mod decode;
pub mod encode;
mod error;
mod stream;

pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{LzwError, LzwResult};

/// A code point in the stream. Codes `0..=255` are the byte literals; the
/// first multi-byte string is assigned code 256.
pub type Code = u32;

/// Compile-time ceiling on the code width, in bits. Both ends of a stream
/// must be built with the same value. Sensible range: 12–24.
pub const MAX_WIDTH: u32 = 20;

/// Number of dictionary slots, and the exclusive upper bound on code values.
pub const DICT_SIZE: usize = 1 << MAX_WIDTH;

/// Width of the first code of a stream and of the first code after a
/// dictionary reset: the smallest width that can carry code 256.
pub(crate) const MIN_WIDTH: u32 = 9;

/// Absent-link marker inside the dictionary arenas. Outside any valid code
/// value, so it never collides with an assigned slot.
pub(crate) const LINK_NONE: Code = Code::MAX;
