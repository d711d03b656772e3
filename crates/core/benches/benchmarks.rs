//! Benchmarks for datemark-core.
//!
//! Run with: `cargo bench -p datemark-core`
//!
//! Results are saved to `target/criterion/` with HTML reports.

use chrono::{NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use datemark_core::{expand, remap, segments_for, Datemark};

/// Task lines representing common use cases.
const INPUTS: &[(&str, &str)] = &[
    ("no_date", "buy milk and eggs"),
    ("shorthand", "call mom tom"),
    ("two_shorthands", "meeting mon and tue"),
    ("with_time", "dentist tom at 5pm"),
    ("phrase", "submit report in 3 days"),
    ("month_day", "renew passport dec 15, 2025"),
];

fn reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .and_then(|d| d.and_hms_opt(10, 0, 0))
        .unwrap_or_default()
}

/// Benchmark the full extraction pipeline.
fn bench_extract(c: &mut Criterion) {
    let dm = Datemark::new();
    let reference = reference();

    let mut group = c.benchmark_group("extract");

    for (name, input) in INPUTS {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("input", name), input, |b, input| {
            b.iter(|| dm.extract_at(black_box(input), reference));
        });
    }

    group.finish();
}

/// Benchmark shorthand expansion alone.
fn bench_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand");

    for (name, input) in INPUTS {
        group.bench_with_input(BenchmarkId::new("input", name), input, |b, input| {
            b.iter(|| expand(black_box(input)));
        });
    }

    group.finish();
}

/// Benchmark remapping against many records.
fn bench_remap(c: &mut Criterion) {
    let text = "tod tom yes mon tue wed thu fri sat sun ".repeat(10);
    let expansion = expand(&text);
    let end = expansion.rewritten.len();

    c.bench_function("remap/100_records", |b| {
        b.iter(|| remap(black_box(end / 2), black_box(end), &expansion.records));
    });
}

/// Benchmark segmenting an already extracted line.
fn bench_segments(c: &mut Criterion) {
    let dm = Datemark::new();
    let text = "meeting mon and tue, then dentist tom at 5pm";
    let result = dm.extract_at(text, reference()).unwrap_or_default();

    c.bench_function("segments_for", |b| {
        b.iter(|| segments_for(black_box(text), &result));
    });
}

/// Benchmark throughput with growing task lists.
fn bench_throughput(c: &mut Criterion) {
    let dm = Datemark::new();
    let reference = reference();

    let mut group = c.benchmark_group("throughput");

    for lines in [1, 8, 32, 128] {
        let input = "pay rent fri, call mom tom. ".repeat(lines);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("bytes", lines), &input, |b, input| {
            b.iter(|| dm.extract_at(black_box(input), reference));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_extract,
    bench_expand,
    bench_remap,
    bench_segments,
    bench_throughput,
);

criterion_main!(benches);
