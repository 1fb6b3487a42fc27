// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::semicolon_if_nothing_returned)] // Benchmark code formatting
#![allow(clippy::redundant_closure_for_method_calls)] // Test code clarity

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use hdds_dynstruct::Builder;
use std::collections::HashMap;

fn declared(fields: usize) -> Builder {
    let builder = Builder::new();
    builder
        .add_field("Name", String::new(), &[r#"json:"name""#])
        .unwrap();
    builder
        .add_field("Scores", HashMap::<String, i32>::new(), &[r#"json:"scores,omitempty""#])
        .unwrap();
    for i in 0..fields {
        builder
            .add_field(&format!("F{}", i), 0u64, &[r#"json:",omitempty""#])
            .unwrap();
    }
    builder
}

// ============================================================================
// Declaration Benchmarks
// ============================================================================

/// Benchmark: declare 16 fields and build
fn bench_declare_and_build(c: &mut Criterion) {
    c.bench_function("declare_and_build_16", |b| {
        b.iter(|| {
            let builder = declared(black_box(14));
            black_box(builder.build().unwrap());
        })
    });
}

/// Benchmark: reset then rebuild with retained named fields
fn bench_reset_rebuild(c: &mut Criterion) {
    c.bench_function("reset_rebuild_64", |b| {
        let builder = declared(62);
        builder.build().unwrap();
        b.iter(|| {
            builder.reset();
            black_box(builder.build().unwrap());
        })
    });
}

// ============================================================================
// Access Benchmarks
// ============================================================================

/// Benchmark: typed read of a primitive field
fn bench_get_field_value(c: &mut Criterion) {
    c.bench_function("get_field_value_u64", |b| {
        let builder = declared(62);
        builder.build().unwrap();
        let mut out = 0u64;
        b.iter(|| {
            builder.get_field_value(black_box("F31"), &mut out).unwrap();
            black_box(out);
        })
    });
}

/// Benchmark: typed write of a map field
fn bench_set_map_field(c: &mut Criterion) {
    c.bench_function("set_field_map_32", |b| {
        let builder = declared(0);
        builder.build().unwrap();
        let scores: HashMap<String, i32> = (0..32).map(|i| (format!("k{}", i), i)).collect();
        b.iter_batched(
            || scores.clone(),
            |scores| builder.set_field("Scores", scores).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

// ============================================================================
// JSON Benchmarks
// ============================================================================

/// Benchmark: encode a 64-field instance
fn bench_to_json(c: &mut Criterion) {
    c.bench_function("to_json_64", |b| {
        let builder = declared(62);
        let instance = builder.build().unwrap();
        for i in (0..62).step_by(2) {
            instance.set(&format!("F{}", i), i as u64).unwrap();
        }
        b.iter(|| black_box(instance.to_json().unwrap()))
    });
}

/// Benchmark: merge a JSON object into a 64-field instance
fn bench_merge_json(c: &mut Criterion) {
    c.bench_function("merge_json_64", |b| {
        let builder = declared(62);
        let instance = builder.build().unwrap();
        let text = instance.to_json().unwrap();
        b.iter(|| instance.merge_json_str(black_box(&text)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_declare_and_build,
    bench_reset_rebuild,
    bench_get_field_value,
    bench_set_map_field,
    bench_to_json,
    bench_merge_json,
);
criterion_main!(benches);
