//! Frequency analysis for byte streams.
//!
//! Counts the occurrence of each byte value (0-255) in an input stream
//! and computes Shannon entropy.

use crate::bitio::BitInput;
use crate::{HzResult, ALPH_SIZE, BITS_PER_WORD};

/// A frequency table that tracks byte occurrence counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    /// Count of each byte value (index = byte value, value = count).
    pub byte: [u64; ALPH_SIZE],
    /// Sum of all counts.
    pub total: u64,
    /// Number of distinct byte values with nonzero count.
    pub used: u32,
}

impl FrequencyTable {
    /// Create a new, zeroed frequency table.
    pub fn new() -> Self {
        Self {
            byte: [0u64; ALPH_SIZE],
            total: 0,
            used: 0,
        }
    }

    /// Count every 8-bit group until `input` reports exhaustion.
    ///
    /// Leaves the stream at its end; the caller rewinds it for the
    /// encoding pass.
    pub fn read_from<I: BitInput>(input: &mut I) -> HzResult<Self> {
        let mut table = Self::new();
        while let Some(byte) = input.read_bits(BITS_PER_WORD)? {
            table.add(byte as u8);
        }
        log::trace!(
            "counted {} bytes, {} distinct",
            table.total,
            table.used
        );
        Ok(table)
    }

    /// Count byte frequencies in an in-memory buffer.
    pub fn count(&mut self, input: &[u8]) {
        for &b in input {
            self.add(b);
        }
    }

    #[inline]
    fn add(&mut self, b: u8) {
        let slot = &mut self.byte[b as usize];
        self.used += (*slot == 0) as u32;
        *slot += 1;
        self.total += 1;
    }

    /// Compute the Shannon entropy of the distribution (in bits per symbol).
    ///
    /// Returns 0.0 if the table is empty.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        self.byte
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let prob = c as f64 / total;
                -prob * prob.log2()
            })
            .sum()
    }

    /// Get the count for a specific byte value.
    pub fn get(&self, byte: u8) -> u64 {
        self.byte[byte as usize]
    }

    /// Iterate `(byte, count)` over observed bytes, in ascending byte order.
    pub fn iter_used(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.byte
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(b, &c)| (b as u8, c))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function: compute a frequency table from input.
pub fn get_frequency(input: &[u8]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    table.count(input);
    table
}
