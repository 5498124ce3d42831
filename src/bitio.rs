//! Bit-level I/O over byte-oriented readers and writers.
//!
//! Bits are packed MSB-first: the first bit written lands in the high bit
//! of the first byte. The codec only talks to the [`BitInput`],
//! [`Rewind`] and [`BitOutput`] traits, so any source or sink that can
//! honor them works.

use std::io::{self, BufReader, BufWriter, Read, Seek, Write};

/// Source of bits, read MSB-first.
pub trait BitInput {
    /// Read the next `n` bits (`1..=32`) as an unsigned value.
    ///
    /// Returns `Ok(None)` when fewer than `n` bits remain.
    fn read_bits(&mut self, n: u32) -> io::Result<Option<u32>>;
}

/// A bit source that can be re-read from its start.
pub trait Rewind {
    fn reset(&mut self) -> io::Result<()>;
}

/// Sink of bits, written MSB-first.
pub trait BitOutput {
    /// Write the low `n` bits (`0..=32`) of `value`.
    fn write_bits(&mut self, n: u32, value: u32) -> io::Result<()>;
}

#[inline]
fn low_mask(n: u32) -> u64 {
    (1u64 << n) - 1
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Buffered MSB-first bit reader.
pub struct BitReader<R: Read> {
    inner: BufReader<R>,
    /// Pending bits, right-aligned.
    buffer: u64,
    /// Number of valid bits in `buffer` (always < 40).
    bits: u32,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner: BufReader::new(inner),
            buffer: 0,
            bits: 0,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.inner.read_exact(&mut byte) {
            Ok(()) => Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl<R: Read> BitInput for BitReader<R> {
    fn read_bits(&mut self, n: u32) -> io::Result<Option<u32>> {
        debug_assert!((1..=32).contains(&n));
        while self.bits < n {
            match self.next_byte()? {
                Some(byte) => {
                    self.buffer = (self.buffer << 8) | byte as u64;
                    self.bits += 8;
                }
                None => return Ok(None),
            }
        }
        self.bits -= n;
        let value = (self.buffer >> self.bits) & low_mask(n);
        self.buffer &= low_mask(self.bits);
        Ok(Some(value as u32))
    }
}

impl<R: Read + Seek> Rewind for BitReader<R> {
    fn reset(&mut self) -> io::Result<()> {
        self.inner.rewind()?;
        self.buffer = 0;
        self.bits = 0;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Buffered MSB-first bit writer.
///
/// Call [`BitWriter::finish`] to flush the last partial byte; dropping the
/// writer without it loses up to 7 bits.
pub struct BitWriter<W: Write> {
    inner: BufWriter<W>,
    buffer: u64,
    bits: u32,
    written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner: BufWriter::new(inner),
            buffer: 0,
            bits: 0,
            written: 0,
        }
    }

    /// Total bits accepted so far, excluding padding.
    pub fn bits_written(&self) -> u64 {
        self.written
    }

    /// Pad the final byte with zero bits, flush, and return the sink.
    pub fn finish(mut self) -> io::Result<W> {
        if self.bits > 0 {
            let byte = (self.buffer << (8 - self.bits)) as u8;
            self.inner.write_all(&[byte])?;
            self.bits = 0;
        }
        self.inner.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write> BitOutput for BitWriter<W> {
    fn write_bits(&mut self, n: u32, value: u32) -> io::Result<()> {
        debug_assert!(n <= 32);
        if n == 0 {
            return Ok(());
        }
        self.buffer = (self.buffer << n) | (value as u64 & low_mask(n));
        self.bits += n;
        while self.bits >= 8 {
            self.bits -= 8;
            self.inner.write_all(&[(self.buffer >> self.bits) as u8])?;
        }
        self.buffer &= low_mask(self.bits);
        self.written += n as u64;
        Ok(())
    }
}
