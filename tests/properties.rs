//! Property tests for the codec: round-trip, header idempotence,
//! prefix-free codes, and truncation detection.

use std::io::Cursor;

use hz::bitio::{BitReader, BitWriter};
use hz::codes::CodeTable;
use hz::header;
use hz::huffman::HuffmanTree;
use hz::{compress_bytes, decompress_bytes, HzError, PSEUDO_EOF};
use proptest::prelude::*;

/// Byte strings over a small alphabet, so codes get long and skewed.
fn skewed_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            8 => Just(b'e'),
            4 => Just(b't'),
            2 => Just(b'a'),
            1 => any::<u8>(),
        ],
        0..2000,
    )
}

proptest! {
    #[test]
    fn prop_round_trip(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        let packed = compress_bytes(&data).unwrap();
        prop_assert_eq!(decompress_bytes(&packed).unwrap(), data);
    }

    #[test]
    fn prop_round_trip_skewed(data in skewed_bytes()) {
        let packed = compress_bytes(&data).unwrap();
        prop_assert_eq!(decompress_bytes(&packed).unwrap(), data);
    }

    #[test]
    fn prop_header_idempotent(data in skewed_bytes()) {
        let tree = HuffmanTree::from_data(&data);
        let mut w = BitWriter::new(Vec::new());
        header::write_header(&tree, &mut w).unwrap();
        let mut r = BitReader::new(Cursor::new(w.finish().unwrap()));
        let back = header::read_header(&mut r).unwrap();
        prop_assert_eq!(back, tree);
    }

    #[test]
    fn prop_codes_prefix_free(data in skewed_bytes()) {
        let table = CodeTable::from_tree(&HuffmanTree::from_data(&data)).unwrap();
        prop_assert!(!table.eof().is_empty());
        prop_assert_eq!(table.get(PSEUDO_EOF), Some(table.eof()));
        let codes: Vec<_> = table.iter().map(|(_, c)| c).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    prop_assert!(!a.is_prefix_of(b), "{} prefixes {}", a, b);
                }
            }
        }
    }

    #[test]
    fn prop_every_byte_has_code(data in prop::collection::vec(any::<u8>(), 1..512)) {
        let table = CodeTable::from_tree(&HuffmanTree::from_data(&data)).unwrap();
        for &b in &data {
            prop_assert!(table.byte(b).is_some_and(|c| !c.is_empty()));
        }
    }

    #[test]
    fn prop_truncation_detected(
        data in prop::collection::vec(any::<u8>(), 0..512),
        cut in any::<prop::sample::Index>(),
    ) {
        let packed = compress_bytes(&data).unwrap();
        let cut = cut.index(packed.len());
        let result = decompress_bytes(&packed[..cut]);
        prop_assert!(matches!(result, Err(HzError::Truncated(_))), "cut {} of {}", cut, packed.len());
    }

    #[test]
    fn prop_foreign_magic_rejected(magic in any::<u32>(), rest in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assume!(magic != header::MAGIC_TREE);
        let mut input = magic.to_be_bytes().to_vec();
        input.extend(rest);
        let result = decompress_bytes(&input);
        let is_mismatch = matches!(result, Err(HzError::FormatMismatch { found, .. }) if found == magic);
        prop_assert!(is_mismatch);
    }
}
