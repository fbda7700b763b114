//! Benchmarks for SafeSeq vs cloning a Vec per snapshot
//!
//! Run with: `cargo bench --bench safe_seq`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use safe_seq::SafeSeq;

fn bench_append_while_iterating(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_while_iterating");

    for size in [16, 256, 4096] {
        group.bench_with_input(BenchmarkId::new("SafeSeq", size), &size, |b, &size| {
            b.iter(|| {
                let mut seq: SafeSeq<u64> = (0..size).collect();
                for x in seq.view() {
                    seq.push(black_box(x));
                }
                black_box(seq);
            });
        });

        group.bench_with_input(BenchmarkId::new("Vec+clone", size), &size, |b, &size| {
            b.iter(|| {
                let mut vec: Vec<u64> = (0..size).collect();
                for x in vec.clone() {
                    vec.push(black_box(x));
                }
                black_box(vec);
            });
        });
    }

    group.finish();
}

fn bench_front_eviction(c: &mut Criterion) {
    let mut group = c.benchmark_group("front_eviction");

    for size in [16, 256, 4096] {
        group.bench_with_input(BenchmarkId::new("SafeSeq", size), &size, |b, &size| {
            b.iter(|| {
                let mut seq: SafeSeq<u64> = (0..size).collect();
                for _ in seq.view() {
                    black_box(seq.remove(0).ok());
                }
                black_box(seq);
            });
        });

        group.bench_with_input(BenchmarkId::new("Vec+clone", size), &size, |b, &size| {
            b.iter(|| {
                let mut vec: Vec<u64> = (0..size).collect();
                for _ in vec.clone() {
                    black_box(vec.remove(0));
                }
                black_box(vec);
            });
        });
    }

    group.finish();
}

fn bench_view_then_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_then_swap");

    // Worst case: every destructive operation follows a fresh view.
    group.bench_function("SafeSeq_interleaved_256", |b| {
        let mut seq: SafeSeq<u64> = (0..256).collect();
        b.iter(|| {
            black_box(seq.view());
            seq.swap(0, 255).ok();
        });
    });

    // Best case: one view, many swaps.
    group.bench_function("SafeSeq_batched_256", |b| {
        let mut seq: SafeSeq<u64> = (0..256).collect();
        b.iter(|| {
            black_box(seq.view());
            for i in 0..128 {
                seq.swap(i, 255 - i).ok();
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_append_while_iterating,
    bench_front_eviction,
    bench_view_then_swap
);
criterion_main!(benches);
