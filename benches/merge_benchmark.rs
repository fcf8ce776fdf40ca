// SPDX-License-Identifier: MIT OR Apache-2.0
// Benchmarks: missing_docs - criterion_group! macro generates undocumentable code
#![allow(missing_docs)]
// Benchmarks: clippy lints relaxed for benchmark code (not production)
#![allow(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Benchmarks for portal configuration merging
//!
//! This benchmark suite measures:
//! - Keyed array merge (linear scan per base element)
//! - Recursive object merge on nested device properties
//! - Full document merge through the portal table
//!
//! Run with: cargo bench --bench merge_benchmark

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use portalcfg_core::{merge_arrays_on_key, merge_documents, merge_objects};
use serde_json::{Value, json};
use std::hint::black_box;

fn devices(count: usize) -> Vec<Value> {
    (0..count)
        .map(|uid| {
            json!({
                "uid": uid,
                "key": format!("device-{uid}"),
                "name": format!("Device {uid}"),
                "properties": {"control": {"method": "tcpIp", "tcpSshProperties": {"port": 23}}}
            })
        })
        .collect()
}

/// Every other device overridden, visited in reverse so scans are not trivially short
fn device_overrides(count: usize) -> Vec<Value> {
    (0..count)
        .rev()
        .step_by(2)
        .map(|uid| json!({"uid": uid, "properties": {"control": {"tcpSshProperties": {"port": 4998}}}}))
        .collect()
}

// =============================================================================
// Keyed Array Merge
// =============================================================================

fn bench_keyed_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge/keyed_array");

    for count in [10, 100, 500].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let base = devices(count);
            let delta = device_overrides(count);

            b.iter(|| black_box(merge_arrays_on_key(&base, Some(delta.as_slice()), "uid")));
        });
    }
    drop(group);
}

// =============================================================================
// Recursive Object Merge
// =============================================================================

fn bench_objects(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge/objects");

    for width in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), width, |b, &width| {
            let base: serde_json::Map<String, Value> = (0..width)
                .map(|i| (format!("field_{i}"), json!({"value": i, "nested": {"a": i}})))
                .collect();
            let delta: serde_json::Map<String, Value> = (0..width)
                .step_by(3)
                .map(|i| (format!("field_{i}"), json!({"nested": {"b": i}})))
                .collect();

            b.iter(|| black_box(merge_objects(&base, &delta)));
        });
    }
    drop(group);
}

// =============================================================================
// Full Document Merge
// =============================================================================

fn bench_documents(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge/document");

    for count in [10, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let template = json!({
                "info": {"name": "Template", "version": "1.0"},
                "devices": devices(count),
                "rooms": [{"key": "room1", "name": "Room"}],
                "sourceLists": {"default": {"laptop": {"order": 1}}},
                "tieLines": [],
                "global": {"defaultLanguage": "en"}
            });
            let system = json!({
                "info": {"name": "Site"},
                "devices": device_overrides(count),
                "rooms": [{"key": "room1", "name": "Boardroom"}]
            });

            b.iter(|| black_box(merge_documents(&template, &system)));
        });
    }
    drop(group);
}

criterion_group!(benches, bench_keyed_array, bench_objects, bench_documents);
criterion_main!(benches);
