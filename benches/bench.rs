use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

/// Deterministic mix of English-like text, runs and noise.
fn test_input(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut state = 0x9E3779B97F4A7C15u64;
    while out.len() < len {
        out.extend_from_slice(b"the quick brown fox jumps over the lazy dog ");
        out.extend_from_slice(&[b'#'; 64]);
        for _ in 0..16 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            out.push(state as u8);
        }
    }
    out.truncate(len);
    out
}

fn bench_compress(c: &mut Criterion) {
    let input = test_input(64 * 1024);
    let mut group = c.benchmark_group("compress");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("64k", |b| {
        b.iter(|| berg::compress(black_box(&input)).unwrap())
    });
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let input = test_input(64 * 1024);
    let compressed = berg::compress(&input).unwrap();
    let mut group = c.benchmark_group("decompress");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("64k", |b| {
        b.iter(|| berg::decompress(black_box(&compressed)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress);
criterion_main!(benches);
