//! File-backed round trips: both compression passes read from disk.

use std::fs::{self, File};

use hz::codec::{compress_stream, decompress_stream, CompressOptions};
use hz::frequency::get_frequency;

fn sample_text(size: usize) -> Vec<u8> {
    let pattern = b"The quick brown fox jumps over the lazy dog. ";
    let full = pattern.repeat((size / pattern.len()) + 1);
    full[..size].to_vec()
}

fn round_trip_file(data: &[u8]) {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("input.bin");
    let packed = dir.path().join("input.bin.hz");
    let restored = dir.path().join("restored.bin");
    fs::write(&src, data).unwrap();

    let (_, stats) = compress_stream(
        File::open(&src).unwrap(),
        File::create(&packed).unwrap(),
        &CompressOptions::default(),
    )
    .unwrap();
    assert_eq!(stats.input_bytes, data.len() as u64);
    assert_eq!(fs::metadata(&packed).unwrap().len(), stats.output_bytes());

    let (_, produced) =
        decompress_stream(File::open(&packed).unwrap(), File::create(&restored).unwrap()).unwrap();
    assert_eq!(produced, data.len() as u64);
    assert_eq!(fs::read(&restored).unwrap(), data);
}

#[test]
fn test_text_file() {
    round_trip_file(&sample_text(100_000));
}

#[test]
fn test_empty_file() {
    round_trip_file(&[]);
}

#[test]
fn test_binary_file() {
    let data: Vec<u8> = (0..50_000u32)
        .map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8)
        .collect();
    round_trip_file(&data);
}

#[test]
fn test_compresses_skewed_text() {
    let data = sample_text(64 * 1024);
    let (packed, stats) = compress_stream(
        std::io::Cursor::new(&data),
        Vec::new(),
        &CompressOptions::default(),
    )
    .unwrap();
    // Per-byte cost stays within one bit of the entropy bound
    let entropy = get_frequency(&data).entropy();
    let bits_per_byte = stats.body_bits as f64 / data.len() as f64;
    assert!(bits_per_byte < entropy + 1.0, "{} vs {}", bits_per_byte, entropy);
    assert!(packed.len() < data.len());
}
