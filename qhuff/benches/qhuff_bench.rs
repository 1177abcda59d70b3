//! Performance benchmarks for qhuff
//!
//! This benchmark suite evaluates:
//! - Tree building and code table derivation
//! - Compression/decompression throughput (MB/s) for several data patterns
//! - Scaling with input size

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use qhuff::{CodeTable, FrequencyTable, HuffmanTree, decode, encode};
use qhuff_core::NoProgress;
use std::hint::black_box;
use std::io::Cursor;

/// Type alias for pattern generator functions
type PatternGenerator = fn(usize) -> Vec<u8>;

/// Generate test data patterns for benchmarking
mod test_data {
    /// Uniform data - a single symbol (one bit per byte)
    pub fn uniform(size: usize) -> Vec<u8> {
        vec![0xAA; size]
    }

    /// Random data - every byte value, flat distribution
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x123456789ABCDEF0;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    /// Text-like data - skewed distribution over a small alphabet
    pub fn text_like(size: usize) -> Vec<u8> {
        let text = b"The quick brown fox jumps over the lazy dog. \
                     Pack my box with five dozen liquor jugs. \
                     How vexingly quick daft zebras jump! \
                     Lorem ipsum dolor sit amet, consectetur adipiscing elit. ";
        text.iter().copied().cycle().take(size).collect()
    }

    /// Skewed data - geometric-like symbol frequencies, long codes
    pub fn skewed(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x0F0F_F0F0_1234_5678;
        while data.len() < size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 40).trailing_zeros().min(20) as u8);
        }
        data
    }
}

mod data_sizes {
    pub const SMALL: usize = 4 * 1024;
    pub const MEDIUM: usize = 64 * 1024;
    pub const LARGE: usize = 1024 * 1024;
}

fn compress(data: &[u8]) -> Vec<u8> {
    let mut archive = Cursor::new(Vec::new());
    encode(&mut Cursor::new(data), &mut archive, &mut NoProgress).unwrap();
    archive.into_inner()
}

/// Benchmark frequency counting, tree building and code derivation
fn bench_code_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("code_table");

    for (name, pattern) in [
        ("text", test_data::text_like as PatternGenerator),
        ("random", test_data::random as PatternGenerator),
    ] {
        let data = pattern(data_sizes::MEDIUM);
        let frequencies = FrequencyTable::from_bytes(&data);

        group.bench_with_input(BenchmarkId::new("build", name), &frequencies, |b, f| {
            b.iter(|| {
                let tree = HuffmanTree::build(black_box(f)).unwrap();
                black_box(CodeTable::generate(&tree).unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark compression speed for different data types
fn bench_compression_data_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_data_types");

    let patterns: [(&str, PatternGenerator); 4] = [
        ("uniform", test_data::uniform as PatternGenerator),
        ("random", test_data::random as PatternGenerator),
        ("text", test_data::text_like as PatternGenerator),
        ("skewed", test_data::skewed as PatternGenerator),
    ];

    for (name, pattern) in patterns {
        let data = pattern(data_sizes::MEDIUM);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| black_box(compress(black_box(data))));
        });
    }

    group.finish();
}

/// Benchmark decompression speed for different data types
fn bench_decompression_data_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompression_data_types");

    let patterns: [(&str, PatternGenerator); 4] = [
        ("uniform", test_data::uniform as PatternGenerator),
        ("random", test_data::random as PatternGenerator),
        ("text", test_data::text_like as PatternGenerator),
        ("skewed", test_data::skewed as PatternGenerator),
    ];

    for (name, pattern) in patterns {
        let data = pattern(data_sizes::MEDIUM);
        let archive = compress(&data);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &archive, |b, archive| {
            b.iter(|| {
                let mut out = Vec::with_capacity(data.len());
                decode(&mut Cursor::new(black_box(archive)), &mut out, &mut NoProgress).unwrap();
                black_box(out);
            });
        });
    }

    group.finish();
}

/// Benchmark round-trip scaling with input size
fn bench_roundtrip_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("roundtrip_sizes");

    for (size_name, size) in [
        ("4kb", data_sizes::SMALL),
        ("64kb", data_sizes::MEDIUM),
        ("1mb", data_sizes::LARGE),
    ] {
        let data = test_data::text_like(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &data, |b, data| {
            b.iter(|| {
                let archive = compress(black_box(data));
                let mut out = Vec::with_capacity(data.len());
                decode(&mut Cursor::new(&archive), &mut out, &mut NoProgress).unwrap();
                black_box(out);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_code_table,
    bench_compression_data_types,
    bench_decompression_data_types,
    bench_roundtrip_sizes,
);
criterion_main!(benches);
