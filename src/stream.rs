//! Byte-stream adapters between the codec and the caller's I/O objects.
//!
//! Both sides of a context talk to the outside world through these small
//! batching buffers: the codec produces and consumes single bytes, the
//! caller's reader/writer sees block-sized transfers.

use std::io::{self, Read, Write};

/// Size of the batching buffer on either side of the adapter.
pub(crate) const STREAM_BUF: usize = 256;

/// Collects single bytes and hands them to the writer one block at a time.
pub(crate) struct ByteWriter<W> {
    inner: W,
    buf: [u8; STREAM_BUF],
    len: usize,
}

impl<W: Write> ByteWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        ByteWriter {
            inner,
            buf: [0; STREAM_BUF],
            len: 0,
        }
    }

    pub(crate) fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.buf[self.len] = byte;
        self.len += 1;
        if self.len == STREAM_BUF {
            self.len = 0;
            self.inner.write_all(&self.buf)?;
        }
        Ok(())
    }

    pub(crate) fn write_all(&mut self, mut bytes: &[u8]) -> io::Result<()> {
        while !bytes.is_empty() {
            let free = STREAM_BUF - self.len;
            if bytes.len() < free {
                self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
                self.len += bytes.len();
                return Ok(());
            }
            let (head, tail) = bytes.split_at(free);
            self.buf[self.len..].copy_from_slice(head);
            self.len = 0;
            self.inner.write_all(&self.buf)?;
            bytes = tail;
        }
        Ok(())
    }

    /// Drains the partial block and flushes the writer behind it.
    pub(crate) fn flush(&mut self) -> io::Result<()> {
        if self.len > 0 {
            let len = self.len;
            self.len = 0;
            self.inner.write_all(&self.buf[..len])?;
        }
        self.inner.flush()
    }

    pub(crate) fn into_inner(self) -> W {
        self.inner
    }
}

/// Refills a block from the reader and yields it chunk-wise.
pub(crate) struct ByteReader<R> {
    inner: R,
    buf: [u8; STREAM_BUF],
    pos: usize,
    len: usize,
}

impl<R: Read> ByteReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        ByteReader {
            inner,
            buf: [0; STREAM_BUF],
            pos: 0,
            len: 0,
        }
    }

    /// Returns the unconsumed part of the current block, refilling it when
    /// empty. An empty slice signals end of input. The reader may fill less
    /// than a whole block mid-stream; only a zero-length read is EOF.
    pub(crate) fn fill(&mut self) -> io::Result<&[u8]> {
        if self.pos == self.len {
            self.len = self.inner.read(&mut self.buf)?;
            self.pos = 0;
        }
        Ok(&self.buf[self.pos..self.len])
    }

    pub(crate) fn consume(&mut self, amount: usize) {
        self.pos += amount;
        debug_assert!(self.pos <= self.len);
    }
}
