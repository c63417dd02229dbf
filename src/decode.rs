//! The decoding half of the codec: bit unpacking, the parent-chain table
//! and the decoder state machine.

use std::io::{Read, Write};

use tracing::{debug, trace};

use crate::error::{LzwError, LzwResult};
use crate::stream::{ByteReader, ByteWriter};
use crate::{Code, DICT_SIZE, LINK_NONE, MAX_WIDTH, MIN_WIDTH};

/// Bit accumulator for the read side. Input bytes enter at the low end,
/// codes are taken from the high end. A code cut in half by a chunk
/// boundary stays buffered until the next chunk arrives.
struct BitReader {
    acc: u64,
    pending: u32,
}

impl BitReader {
    fn new() -> Self {
        BitReader { acc: 0, pending: 0 }
    }

    /// Takes `nbits` from the stream, pulling bytes from `inp` as needed.
    /// `None` when the chunk runs dry before a whole code is available.
    fn read(&mut self, inp: &mut &[u8], nbits: u32) -> Option<Code> {
        while self.pending < nbits {
            let (&byte, rest) = inp.split_first()?;
            *inp = rest;
            self.acc = (self.acc << 8) | u64::from(byte);
            self.pending += 8;
        }
        self.pending -= nbits;
        Some(((self.acc >> self.pending) & ((1u64 << nbits) - 1)) as Code)
    }

    /// Bits buffered but not yet consumed as part of a code.
    fn buffered(&self) -> u32 {
        self.pending
    }

    /// Whether the buffered bits are all zero, i.e. could be trailing pad.
    fn residue_is_zero(&self) -> bool {
        self.pending == 0 || self.acc & ((1u64 << self.pending) - 1) == 0
    }
}

/// One table entry; `prev == LINK_NONE` marks a byte-literal root.
#[derive(Clone, Copy)]
struct Entry {
    prev: Code,
    byte: u8,
}

/// Fixed arena of parent links, plus the scratch buffer that strings are
/// reconstructed into. The decoder only ever walks toward the root, so no
/// child lists are kept.
struct Table {
    entries: Vec<Entry>,
    /// Reconstruction target, filled from the tail. Sized for the longest
    /// chain the arena can hold.
    scratch: Box<[u8]>,
}

impl Table {
    fn new() -> Self {
        let mut table = Table {
            entries: Vec::with_capacity(DICT_SIZE),
            scratch: vec![0; DICT_SIZE].into_boxed_slice(),
        };
        table.seed();
        table
    }

    fn seed(&mut self) {
        for byte in 0..=255u8 {
            self.entries.push(Entry {
                prev: LINK_NONE,
                byte,
            });
        }
    }

    /// Largest assigned code.
    fn max(&self) -> Code {
        (self.entries.len() - 1) as Code
    }

    /// Records `prev + byte` under the next free code, or `None` when the
    /// arena is full.
    fn add(&mut self, prev: Code, byte: u8) -> Option<Code> {
        if self.entries.len() == DICT_SIZE {
            return None;
        }
        let code = self.entries.len() as Code;
        self.entries.push(Entry { prev, byte });
        Some(code)
    }

    fn reset(&mut self) {
        self.entries.truncate(256);
    }

    /// Rebuilds the string behind `code` by walking the parent chain,
    /// writing bytes from the tail of the scratch buffer toward its head.
    /// The returned slice is the filled suffix; its first element is the
    /// head byte of the string.
    fn reconstruct(&mut self, code: Code) -> &[u8] {
        let mut at = self.scratch.len();
        let mut code = code;
        loop {
            let entry = self.entries[code as usize];
            at -= 1;
            self.scratch[at] = entry.byte;
            if entry.prev == LINK_NONE {
                break;
            }
            code = entry.prev;
        }
        &self.scratch[at..]
    }
}

/// Streaming decoder.
///
/// Compressed chunks are pushed through [`decode`](Decoder::decode); decoded
/// bytes leave through the writer handed to [`new`](Decoder::new). End of
/// input is reported through [`finish`](Decoder::finish), which checks that
/// nothing but byte-boundary padding is left over.
pub struct Decoder<W: Write> {
    out: ByteWriter<W>,
    bits: BitReader,
    table: Table,
    /// The previously consumed code; `None` at stream start and right after
    /// a dictionary reset.
    prev: Option<Code>,
    /// Head byte of the previously emitted string, the `K` of the K-ω-K
    /// special case.
    first_byte: u8,
    width: u32,
}

impl<W: Write> Decoder<W> {
    /// Creates a decoder writing decoded bytes to `writer`.
    ///
    /// The table arena and the reconstruction buffer are allocated here;
    /// steady-state decoding does not allocate.
    pub fn new(writer: W) -> Self {
        Decoder {
            out: ByteWriter::new(writer),
            bits: BitReader::new(),
            table: Table::new(),
            prev: None,
            first_byte: 0,
            width: MIN_WIDTH,
        }
    }

    /// Consumes a chunk of the code stream.
    ///
    /// Codes may straddle chunk boundaries; the cut bits carry over to the
    /// next call. A decoder that returned an error is poisoned and should
    /// be dropped.
    pub fn decode(&mut self, buf: &[u8]) -> LzwResult<()> {
        let mut inp = buf;
        loop {
            // Widen before the read whenever the encoder's dictionary can
            // have outgrown the current width. The decoder's table runs one
            // entry behind the encoder's, hence `max + 1` against the
            // encoder's `max` in its pre-write check.
            let mut width = self.width;
            if self.table.max() + 1 == (1 << width) {
                width += 1;
            }
            debug_assert!(width <= MAX_WIDTH);
            let code = match self.bits.read(&mut inp, width) {
                Some(code) => code,
                None => return Ok(()),
            };
            self.width = width;
            self.step(code)?;
        }
    }

    /// Validates the trailing bits and flushes the decoded output. Hands
    /// the writer back.
    ///
    /// Up to 7 zero bits are the encoder's byte-boundary padding and are
    /// accepted; anything else is the stump of a truncated code.
    pub fn finish(mut self) -> LzwResult<W> {
        let bits = self.bits.buffered();
        if bits >= 8 || !self.bits.residue_is_zero() {
            return Err(LzwError::InputUnderrun { bits });
        }
        self.out.flush()?;
        Ok(self.out.into_inner())
    }

    /// Drains `reader` through the decoder; end of input finishes the
    /// stream implicitly.
    pub fn decode_all<R: Read>(mut self, reader: R) -> LzwResult<W> {
        let mut input = ByteReader::new(reader);
        loop {
            let consumed = {
                let chunk = input.fill()?;
                if chunk.is_empty() {
                    break;
                }
                self.decode(chunk)?;
                chunk.len()
            };
            input.consume(consumed);
        }
        self.finish()
    }

    /// Processes one code: emit its string, grow the table by the previous
    /// string plus the new head byte, and reset once every code is taken.
    fn step(&mut self, code: Code) -> LzwResult<()> {
        let max = self.table.max();
        if code <= max {
            let string = self.table.reconstruct(code);
            let first = string[0];
            self.out.write_all(string)?;
            if let Some(prev) = self.prev {
                self.table
                    .add(prev, first)
                    .ok_or(LzwError::DictionaryFull)?;
            }
            self.first_byte = first;
        } else if let (Some(prev), true) = (self.prev, code == max + 1) {
            // The code refers to the entry being defined by this very step,
            // which can only be the previous string extended by its own
            // head byte.
            trace!(code, "synthesizing just-defined code");
            let created = self
                .table
                .add(prev, self.first_byte)
                .ok_or(LzwError::DictionaryFull)?;
            debug_assert_eq!(created, code);
            let string = self.table.reconstruct(code);
            self.first_byte = string[0];
            self.out.write_all(string)?;
        } else {
            return Err(LzwError::InvalidCode { code, max });
        }

        if self.table.max() as usize == DICT_SIZE - 1 {
            // The encoder resets after the emit that fails to insert; from
            // here the next code on the wire is the first of a fresh epoch.
            debug!("dictionary full, resetting");
            self.table.reset();
            self.width = MIN_WIDTH;
            self.prev = None;
        } else {
            self.prev = Some(code);
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn dictionary_state(&self) -> (Code, u32) {
        (self.table.max(), self.width)
    }
}
