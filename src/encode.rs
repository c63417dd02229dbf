//! The encoding half of the codec: bit packing, the prefix trie and the
//! encoder state machine.

use std::io::{self, Read, Write};

use tracing::debug;

use crate::error::LzwResult;
use crate::stream::{ByteReader, ByteWriter};
use crate::{Code, DICT_SIZE, LINK_NONE, MAX_WIDTH, MIN_WIDTH};

/// Bit accumulator for the write side. Codes enter at the low end, whole
/// bytes leave from the high end, most significant bit first.
struct BitWriter {
    acc: u64,
    pending: u32,
}

impl BitWriter {
    fn new() -> Self {
        BitWriter { acc: 0, pending: 0 }
    }

    /// Appends the low `nbits` bits of `code` and flushes every complete
    /// byte to the stream adapter.
    fn write<W: Write>(
        &mut self,
        out: &mut ByteWriter<W>,
        code: Code,
        nbits: u32,
    ) -> io::Result<()> {
        self.acc = (self.acc << nbits) | (u64::from(code) & ((1u64 << nbits) - 1));
        self.pending += nbits;
        while self.pending >= 8 {
            self.pending -= 8;
            out.write_byte((self.acc >> self.pending) as u8)?;
        }
        Ok(())
    }

    /// Pads with zero bits up to the next byte boundary. Called exactly once,
    /// at the end of the stream.
    fn pad_to_byte<W: Write>(&mut self, out: &mut ByteWriter<W>) -> io::Result<()> {
        if self.pending & 7 != 0 {
            self.write(out, 0, 8 - (self.pending & 7))?;
        }
        Ok(())
    }
}

/// One arena node. `prev` and `byte` spell the represented string; the
/// children hang off a list threaded through `first_child`/`next_sibling`,
/// newest child first.
#[derive(Clone, Copy)]
struct Node {
    prev: Code,
    first_child: Code,
    next_sibling: Code,
    byte: u8,
}

/// Fixed-capacity prefix trie over every assigned code.
///
/// The arena is allocated once; the next free code is implied by the node
/// count, so `max` is always `len - 1`.
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn new() -> Self {
        let mut tree = Tree {
            nodes: Vec::with_capacity(DICT_SIZE),
        };
        tree.seed();
        tree
    }

    /// Installs the 256 byte-literal roots.
    fn seed(&mut self) {
        for byte in 0..=255u8 {
            self.nodes.push(Node {
                prev: LINK_NONE,
                first_child: LINK_NONE,
                next_sibling: LINK_NONE,
                byte,
            });
        }
    }

    /// Largest assigned code.
    fn max(&self) -> Code {
        (self.nodes.len() - 1) as Code
    }

    /// Looks up the extension of `parent` by `byte`: a linear scan of the
    /// child list, bounded by the node's fan-out.
    fn find_child(&self, parent: Code, byte: u8) -> Option<Code> {
        let mut link = self.nodes[parent as usize].first_child;
        while link != LINK_NONE {
            let node = &self.nodes[link as usize];
            debug_assert_eq!(node.prev, parent);
            if node.byte == byte {
                return Some(link);
            }
            link = node.next_sibling;
        }
        None
    }

    /// Assigns the next free code to `parent + byte` and links it at the
    /// head of the parent's child list. `None` when the arena is full.
    fn add_child(&mut self, parent: Code, byte: u8) -> Option<Code> {
        if self.nodes.len() == DICT_SIZE {
            return None;
        }
        let code = self.nodes.len() as Code;
        let head = self.nodes[parent as usize].first_child;
        self.nodes.push(Node {
            prev: parent,
            first_child: LINK_NONE,
            next_sibling: head,
            byte,
        });
        self.nodes[parent as usize].first_child = code;
        Some(code)
    }

    /// Drops every multi-byte code. The roots stay; clearing their child
    /// links is what makes the old entries unreachable.
    fn reset(&mut self) {
        self.nodes.truncate(256);
        for node in &mut self.nodes {
            node.first_child = LINK_NONE;
        }
    }
}

/// Streaming encoder.
///
/// Raw bytes are pushed through [`encode`](Encoder::encode); the code stream
/// leaves through the writer handed to [`new`](Encoder::new). A stream is
/// only valid once [`finish`](Encoder::finish) has emitted the final prefix
/// and the byte-boundary padding.
pub struct Encoder<W: Write> {
    out: ByteWriter<W>,
    bits: BitWriter,
    tree: Tree,
    /// The code for the bytes matched so far; `None` before the first byte.
    current: Option<Code>,
    width: u32,
}

impl<W: Write> Encoder<W> {
    /// Creates an encoder writing the code stream to `writer`.
    ///
    /// The dictionary arena is allocated here; steady-state encoding does
    /// not allocate.
    pub fn new(writer: W) -> Self {
        Encoder {
            out: ByteWriter::new(writer),
            bits: BitWriter::new(),
            tree: Tree::new(),
            current: None,
            width: MIN_WIDTH,
        }
    }

    /// Consumes a chunk of raw bytes.
    ///
    /// May be called any number of times; the prefix under construction
    /// carries over between calls. Only I/O errors from the writer can
    /// surface here.
    pub fn encode(&mut self, buf: &[u8]) -> LzwResult<()> {
        for &byte in buf {
            let current = match self.current {
                Some(code) => code,
                None => {
                    self.current = Some(Code::from(byte));
                    continue;
                }
            };
            if let Some(next) = self.tree.find_child(current, byte) {
                self.current = Some(next);
                continue;
            }
            self.emit(current)?;
            if self.tree.add_child(current, byte).is_none() {
                debug!(max = self.tree.max(), "dictionary full, resetting");
                self.tree.reset();
                self.width = MIN_WIDTH;
            }
            self.current = Some(Code::from(byte));
        }
        Ok(())
    }

    /// Emits the final prefix, pads the bit stream to a byte boundary and
    /// flushes the stream adapter. Hands the writer back.
    pub fn finish(mut self) -> LzwResult<W> {
        if let Some(code) = self.current.take() {
            self.emit(code)?;
        }
        self.bits.pad_to_byte(&mut self.out)?;
        self.out.flush()?;
        Ok(self.out.into_inner())
    }

    /// Drains `reader` through the encoder and finishes the stream.
    pub fn encode_all<R: Read>(mut self, reader: R) -> LzwResult<W> {
        let mut input = ByteReader::new(reader);
        loop {
            let consumed = {
                let chunk = input.fill()?;
                if chunk.is_empty() {
                    break;
                }
                self.encode(chunk)?;
                chunk.len()
            };
            input.consume(consumed);
        }
        self.finish()
    }

    /// Writes one code, widening first once the dictionary has outgrown the
    /// current width. The decoder runs the mirrored check before every read;
    /// the two checks must sit on the same side of the wire operation or the
    /// streams desynchronize.
    fn emit(&mut self, code: Code) -> io::Result<()> {
        if self.tree.max() == (1 << self.width) {
            self.width += 1;
        }
        debug_assert!(self.width <= MAX_WIDTH);
        self.bits.write(&mut self.out, code, self.width)
    }

    #[cfg(test)]
    pub(crate) fn dictionary_state(&self) -> (Code, u32) {
        (self.tree.max(), self.width)
    }
}
