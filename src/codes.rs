//! Code table: the root-to-leaf bit path of every leaf in a Huffman tree.

use std::fmt;
use std::io;

use crate::bitio::BitOutput;
use crate::frequency::FrequencyTable;
use crate::huffman::{HuffmanTree, MAX_LEAVES};
use crate::{HzError, HzResult, PSEUDO_EOF};

/// Longest code a [`Code`] can hold.
///
/// A tree built from `u64` counts cannot get this deep: a Huffman tree of
/// depth `d` needs a total weight of at least the `d+2`th Fibonacci number,
/// which passes `u64::MAX` before `d` reaches 93.
pub const MAX_CODE_LEN: usize = 128;

/// A root-to-leaf path. Bit `len-1` of `bits` is the first step from the
/// root; 0 means left, 1 means right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Code {
    bits: u128,
    len: u8,
}

impl Code {
    pub fn new(bits: u128, len: u8) -> Self {
        debug_assert!(len as usize <= MAX_CODE_LEN);
        let mask = if len as usize == MAX_CODE_LEN {
            u128::MAX
        } else {
            (1u128 << len) - 1
        };
        Code {
            bits: bits & mask,
            len,
        }
    }

    pub fn bits(&self) -> u128 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True if `self` is a proper or equal prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len
            && other
                .bits
                .checked_shr((other.len - self.len) as u32)
                .unwrap_or(0)
                == self.bits
    }

    /// Write the path MSB-first, exactly `len` bits, leading zeros included.
    pub fn write_to<O: BitOutput>(&self, out: &mut O) -> io::Result<()> {
        let mut remaining = self.len as u32;
        while remaining > 0 {
            let n = remaining.min(32);
            remaining -= n;
            out.write_bits(n, (self.bits >> remaining) as u32)?;
        }
        Ok(())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.len).rev() {
            f.write_str(if (self.bits >> i) & 1 == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Codes for every byte value plus pseudo-EOF.
///
/// Only symbols with a leaf in the source tree have an entry, and no entry
/// is a prefix of another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
    eof: Code,
}

impl CodeTable {
    /// Walk `tree` depth-first, appending 0 on each left step and 1 on
    /// each right step, and record the path at every leaf.
    pub fn from_tree(tree: &HuffmanTree) -> HzResult<Self> {
        let mut codes: Vec<Option<Code>> = vec![None; MAX_LEAVES];
        let mut stack: Vec<(usize, u128, usize)> = vec![(tree.root(), 0, 0)];

        while let Some((idx, bits, depth)) = stack.pop() {
            let node = tree.node(idx);
            match node.children() {
                Some((left, right)) => {
                    stack.push((right, (bits << 1) | 1, depth + 1));
                    stack.push((left, bits << 1, depth + 1));
                }
                None => {
                    if depth > MAX_CODE_LEN {
                        return Err(HzError::CodeTooLong {
                            symbol: node.value,
                            len: depth,
                        });
                    }
                    let slot = codes
                        .get_mut(node.value as usize)
                        .ok_or(HzError::MalformedHeader("leaf value out of range"))?;
                    *slot = Some(Code::new(bits, depth as u8));
                }
            }
        }

        let eof = codes[PSEUDO_EOF as usize]
            .ok_or(HzError::MalformedHeader("tree has no pseudo-EOF leaf"))?;
        let table = CodeTable { codes, eof };
        if log::log_enabled!(log::Level::Trace) {
            for (symbol, code) in table.iter() {
                log::trace!("code {:>3} -> {}", symbol, code);
            }
        }
        Ok(table)
    }

    /// Code for a symbol (0-255 or [`PSEUDO_EOF`]).
    pub fn get(&self, symbol: u16) -> Option<Code> {
        self.codes.get(symbol as usize).copied().flatten()
    }

    /// Code for a byte value.
    #[inline]
    pub fn byte(&self, b: u8) -> Option<Code> {
        self.codes[b as usize]
    }

    /// Code of the pseudo-EOF terminator.
    pub fn eof(&self) -> Code {
        self.eof
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.map(|c| (s as u16, c)))
    }

    /// Mean code length in bits per byte of the distribution in `freq`.
    ///
    /// Returns 0.0 when `freq` counted nothing.
    pub fn average_length(&self, freq: &FrequencyTable) -> f64 {
        if freq.total == 0 {
            return 0.0;
        }
        let bits: u64 = freq
            .iter_used()
            .map(|(b, c)| c * self.byte(b).map_or(0, |code| code.len() as u64))
            .sum();
        bits as f64 / freq.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::BitWriter;
    use crate::frequency::get_frequency;

    fn table_for(input: &[u8]) -> CodeTable {
        CodeTable::from_tree(&HuffmanTree::from_data(input)).unwrap()
    }

    #[test]
    fn test_repeated_symbol_codes() {
        let table = table_for(&[b'A'; 100]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.eof().to_string(), "0");
        assert_eq!(table.byte(b'A').unwrap().to_string(), "1");
        assert!(table.byte(b'B').is_none());
    }

    #[test]
    fn test_empty_input_codes() {
        let table = table_for(&[]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.eof().len(), 1);
        assert_eq!(table.byte(0).unwrap().len(), 1);
    }

    #[test]
    fn test_known_layout() {
        let table = table_for(b"ab");
        assert_eq!(table.get(PSEUDO_EOF).unwrap().to_string(), "0");
        assert_eq!(table.byte(b'a').unwrap().to_string(), "10");
        assert_eq!(table.byte(b'b').unwrap().to_string(), "11");
    }

    #[test]
    fn test_prefix_free() {
        let table = table_for(b"aaabbbccddeefghhhhhhhhhhhhhhijk");
        let codes: Vec<(u16, Code)> = table.iter().collect();
        for (i, (si, ci)) in codes.iter().enumerate() {
            assert!(!ci.is_empty());
            for (j, (sj, cj)) in codes.iter().enumerate() {
                if i != j {
                    assert!(!ci.is_prefix_of(cj), "{} ({}) prefixes {} ({})", si, ci, sj, cj);
                }
            }
        }
    }

    #[test]
    fn test_full_alphabet_average_length() {
        let input: Vec<u8> = (0..=255).collect();
        let table = table_for(&input);
        assert_eq!(table.len(), MAX_LEAVES);
        let avg = table.average_length(&get_frequency(&input));
        let ideal = (MAX_LEAVES as f64).log2();
        assert!((avg - ideal).abs() < 0.1, "avg {} ideal {}", avg, ideal);
    }

    #[test]
    fn test_display_keeps_leading_zeros() {
        assert_eq!(Code::new(0b001, 3).to_string(), "001");
        assert_eq!(Code::new(0, 1).to_string(), "0");
    }

    #[test]
    fn test_is_prefix_of() {
        let a = Code::new(0b10, 2);
        assert!(a.is_prefix_of(&Code::new(0b101, 3)));
        assert!(!a.is_prefix_of(&Code::new(0b111, 3)));
        assert!(!Code::new(0b101, 3).is_prefix_of(&a));
    }

    #[test]
    fn test_write_long_code() {
        // 40-bit code spans a 32-bit chunk boundary
        let code = Code::new(0x80_0000_0001, 40);
        let mut w = BitWriter::new(Vec::new());
        code.write_to(&mut w).unwrap();
        assert_eq!(w.bits_written(), 40);
        assert_eq!(w.finish().unwrap(), vec![0x80, 0, 0, 0, 0x01]);
    }

    #[test]
    fn test_write_preserves_leading_zeros() {
        let mut w = BitWriter::new(Vec::new());
        Code::new(0b0001, 4).write_to(&mut w).unwrap();
        Code::new(0b0000, 4).write_to(&mut w).unwrap();
        assert_eq!(w.finish().unwrap(), vec![0b0001_0000]);
    }
}
