//! Storage backend benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use streamjson_bench::random_data;
use streamjson_storage::{copy_range, FileBackend, InMemoryBackend, SpooledBackend, StorageBackend};

/// Benchmark inserting in the middle of stores of growing size.
fn bench_insert_middle(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_middle");
    group.sample_size(30);
    let member = random_data(64);

    for size in [1024usize, 16 * 1024, 256 * 1024] {
        group.throughput(Throughput::Bytes(member.len() as u64));

        group.bench_with_input(BenchmarkId::new("memory", size), &size, |b, &size| {
            let mut backend = InMemoryBackend::with_data(random_data(size));
            b.iter(|| {
                backend.insert_at(black_box(size as u64 / 2), &member).unwrap();
                backend.truncate(size as u64).unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("file", size), &size, |b, &size| {
            let mut backend = FileBackend::temp().unwrap();
            backend.append(&random_data(size)).unwrap();
            b.iter(|| {
                backend.insert_at(black_box(size as u64 / 2), &member).unwrap();
                backend.truncate(size as u64).unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark rewriting a short header at the front.
fn bench_splice_header(c: &mut Criterion) {
    let mut group = c.benchmark_group("splice_header");
    let body = random_data(64 * 1024);

    group.bench_function("memory", |b| {
        let mut backend = InMemoryBackend::with_data(body.clone());
        b.iter(|| {
            backend.splice(0, 4, black_box(b"abcd")).unwrap();
        });
    });

    group.bench_function("file", |b| {
        let mut backend = FileBackend::temp().unwrap();
        backend.append(&body).unwrap();
        b.iter(|| {
            backend.splice(0, 4, black_box(b"abcd")).unwrap();
        });
    });

    group.finish();
}

/// Benchmark chunked copies between stores.
fn bench_copy_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy_range");
    group.sample_size(30);

    for size in [4 * 1024usize, 256 * 1024, 2 * 1024 * 1024] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let src = InMemoryBackend::with_data(random_data(size));
            b.iter(|| {
                let mut dest = InMemoryBackend::new();
                let copied = copy_range(&src, 0, size as u64, &mut dest).unwrap();
                black_box(copied);
            });
        });
    }

    group.finish();
}

/// Benchmark appends that cross the spill threshold.
fn bench_spooled_spill(c: &mut Criterion) {
    let mut group = c.benchmark_group("spooled_spill");
    group.sample_size(20);
    let chunk = random_data(4096);

    group.bench_function("64k_threshold_256k_written", |b| {
        b.iter(|| {
            let mut backend = SpooledBackend::new(64 * 1024);
            for _ in 0..64 {
                backend.append(black_box(&chunk)).unwrap();
            }
            black_box(backend.is_spilled());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_middle,
    bench_splice_header,
    bench_copy_range,
    bench_spooled_spill,
);

criterion_main!(benches);
