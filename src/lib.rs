//! hz: lossless byte-stream compression with a per-file Huffman code.
//!
//! Compression makes two passes over a rewindable input: one to count byte
//! frequencies, one to emit codes. The output is self-describing:
//!
//! ```text
//! [magic: 32 bits][tree: preorder, 0 = internal, 1 + 9-bit value = leaf][body codes...][pseudo-EOF code][zero pad]
//! ```
//!
//! ```
//! let packed = hz::compress_bytes(b"abracadabra").unwrap();
//! assert_eq!(hz::decompress_bytes(&packed).unwrap(), b"abracadabra");
//! ```

pub mod bitio;
pub mod codec;
pub mod codes;
pub mod frequency;
pub mod header;
pub mod huffman;
pub mod pqueue;

pub use codec::{
    compress, compress_bytes, decompress, decompress_bytes, CompressOptions, CompressStats,
};
pub use header::HeaderMode;

use std::fmt;
use std::io;

/// Width of one input/output symbol.
pub const BITS_PER_WORD: u32 = 8;
/// Width of the magic number.
pub const BITS_PER_INT: u32 = 32;
/// Number of real symbols.
pub const ALPH_SIZE: usize = 1 << BITS_PER_WORD;
/// Pseudo-EOF symbol, one past the largest byte value.
pub const PSEUDO_EOF: u16 = ALPH_SIZE as u16;

/// Part of a compressed stream being read when it ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Magic,
    Header,
    Body,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Magic => write!(f, "magic number"),
            Section::Header => write!(f, "tree header"),
            Section::Body => write!(f, "body"),
        }
    }
}

/// Error types for hz operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HzError {
    /// Leading magic number is not the tree-header format.
    #[error("bad magic number {found:#010x}, expected {expected:#010x}")]
    FormatMismatch { found: u32, expected: u32 },
    /// Stream ended before the pseudo-EOF code was read.
    #[error("compressed stream truncated in {0}")]
    Truncated(Section),
    /// Tree header decoded to a tree no encoder produces.
    #[error("malformed tree header: {0}")]
    MalformedHeader(&'static str),
    /// Encode pass saw a byte the counting pass did not.
    #[error("byte {0:#04x} has no code; input changed between passes")]
    UnknownSymbol(u8),
    /// Tree too deep to hold its codes in 128 bits.
    #[error("code for symbol {symbol} is {len} bits long")]
    CodeTooLong { symbol: u16, len: usize },
    /// Header format is reserved but not implemented.
    #[error("{0:?} header is not supported")]
    Unsupported(HeaderMode),
    /// Upstream read or write failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type HzResult<T> = Result<T, HzError>;
