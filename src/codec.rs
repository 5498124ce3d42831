//! Compression and decompression drivers.
//!
//! Compression is two passes over a rewindable input: count bytes, build
//! the tree and code table, write the header, rewind, then write one code
//! per input byte followed by the pseudo-EOF code. There is no length
//! field anywhere; the pseudo-EOF code alone ends the body.
//!
//! Decompression reads the header back into a tree and walks it one bit
//! at a time, emitting a byte at every leaf until it reaches pseudo-EOF.
use std::io::{Cursor, Read, Seek, Write};

use crate::bitio::{BitInput, BitOutput, BitReader, BitWriter, Rewind};
use crate::codes::CodeTable;
use crate::frequency::FrequencyTable;
use crate::header::{self, HeaderMode};
use crate::huffman::HuffmanTree;
use crate::{HzError, HzResult, Section, BITS_PER_WORD, PSEUDO_EOF};

/// Options for [`compress`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressOptions {
    /// Header format to write. Only [`HeaderMode::Tree`] is implemented.
    pub header: HeaderMode,
}

/// Summary of one compression run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressStats {
    /// Bytes read in each pass.
    pub input_bytes: u64,
    /// Leaves in the tree, pseudo-EOF included.
    pub symbols: usize,
    /// Magic plus tree bits.
    pub header_bits: u64,
    /// Code bits, terminator included.
    pub body_bits: u64,
}

impl CompressStats {
    pub fn total_bits(&self) -> u64 {
        self.header_bits + self.body_bits
    }

    /// Size of the output once padded to a whole byte.
    pub fn output_bytes(&self) -> u64 {
        self.total_bits().div_ceil(8)
    }
}

/// Compress `input` into `output`.
///
/// `input` is read to exhaustion twice, with a `reset` in between; it must
/// yield the same bytes both times.
pub fn compress<I, O>(
    input: &mut I,
    output: &mut O,
    options: &CompressOptions,
) -> HzResult<CompressStats>
where
    I: BitInput + Rewind,
    O: BitOutput,
{
    if options.header != HeaderMode::Tree {
        return Err(HzError::Unsupported(options.header));
    }

    let freq = FrequencyTable::read_from(input)?;
    let tree = HuffmanTree::from_frequency_table(&freq);
    let table = CodeTable::from_tree(&tree)?;

    header::write_header(&tree, output)?;
    input.reset()?;
    let body_bits = write_body(input, &table, output)?;

    let stats = CompressStats {
        input_bytes: freq.total,
        symbols: tree.leaf_count(),
        header_bits: header::header_bits(&tree),
        body_bits,
    };
    log::debug!(
        "compressed {} bytes: {} symbols, {} header bits, {} body bits",
        stats.input_bytes,
        stats.symbols,
        stats.header_bits,
        stats.body_bits
    );
    Ok(stats)
}

/// Write the code of every byte in `input`, then the pseudo-EOF code.
///
/// Returns the number of bits written.
pub fn write_body<I, O>(input: &mut I, table: &CodeTable, output: &mut O) -> HzResult<u64>
where
    I: BitInput,
    O: BitOutput,
{
    let mut bits = 0u64;
    while let Some(word) = input.read_bits(BITS_PER_WORD)? {
        let byte = word as u8;
        let code = table.byte(byte).ok_or(HzError::UnknownSymbol(byte))?;
        code.write_to(output)?;
        bits += code.len() as u64;
    }
    let eof = table.eof();
    eof.write_to(output)?;
    Ok(bits + eof.len() as u64)
}

/// Decompress `input` into `output`, returning the number of bytes written.
pub fn decompress<I, O>(input: &mut I, output: &mut O) -> HzResult<u64>
where
    I: BitInput,
    O: BitOutput,
{
    let tree = header::read_header(input)?;
    let produced = read_body(&tree, input, output)?;
    log::debug!(
        "decompressed {} bytes with a {}-leaf tree",
        produced,
        tree.leaf_count()
    );
    Ok(produced)
}

/// Walk `tree` against the bits of `input` until the pseudo-EOF leaf.
///
/// Running out of bits first is an error, never a short result.
pub fn read_body<I, O>(tree: &HuffmanTree, input: &mut I, output: &mut O) -> HzResult<u64>
where
    I: BitInput,
    O: BitOutput,
{
    let root = tree.root();
    let mut current = root;
    let mut produced = 0u64;

    loop {
        let bit = input
            .read_bits(1)?
            .ok_or(HzError::Truncated(Section::Body))?;
        current = tree
            .child(current, bit)
            .ok_or(HzError::MalformedHeader("tree root is a leaf"))?;

        let node = tree.node(current);
        if node.is_leaf() {
            if node.value == PSEUDO_EOF {
                return Ok(produced);
            }
            output.write_bits(BITS_PER_WORD, node.value as u32)?;
            produced += 1;
            current = root;
        }
    }
}

/// Compress a seekable reader into a writer.
///
/// Returns the writer, flushed, along with the run summary.
pub fn compress_stream<R, W>(
    input: R,
    output: W,
    options: &CompressOptions,
) -> HzResult<(W, CompressStats)>
where
    R: Read + Seek,
    W: Write,
{
    let mut reader = BitReader::new(input);
    let mut writer = BitWriter::new(output);
    let stats = compress(&mut reader, &mut writer, options)?;
    Ok((writer.finish()?, stats))
}

/// Decompress a reader into a writer, returning the writer and the number
/// of bytes produced.
pub fn decompress_stream<R: Read, W: Write>(input: R, output: W) -> HzResult<(W, u64)> {
    let mut reader = BitReader::new(input);
    let mut writer = BitWriter::new(output);
    let produced = decompress(&mut reader, &mut writer)?;
    Ok((writer.finish()?, produced))
}

/// Compress an in-memory buffer.
pub fn compress_bytes(input: &[u8]) -> HzResult<Vec<u8>> {
    let (out, _) = compress_stream(Cursor::new(input), Vec::new(), &CompressOptions::default())?;
    Ok(out)
}

/// Decompress an in-memory buffer.
pub fn decompress_bytes(input: &[u8]) -> HzResult<Vec<u8>> {
    let (out, _) = decompress_stream(input, Vec::new())?;
    Ok(out)
}
