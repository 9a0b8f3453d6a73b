//! Criterion benchmarks for docfield.
//!
//! Covers the hot paths of the field-value maps:
//! - Insert and lookup by field name
//! - Nested lookup by field path
//! - Flattening and expanding nested documents

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use docfield::document::{FieldPath, FieldValue, MapFieldValue};

/// Generate a nested document with `width` fields per level.
fn generate_document(width: usize, depth: usize) -> MapFieldValue {
    let mut map = MapFieldValue::with_capacity(width);
    for i in 0..width {
        let value = if depth > 0 {
            FieldValue::Map(generate_document(width, depth - 1))
        } else {
            FieldValue::Integer(i as i64)
        };
        map.insert(format!("field{i}"), value);
    }
    map
}

fn bench_insert_lookup(c: &mut Criterion) {
    let keys: Vec<String> = (0..1000).map(|i| format!("field{i}")).collect();

    let mut group = c.benchmark_group("map");
    group.throughput(Throughput::Elements(keys.len() as u64));

    group.bench_function("insert_1000", |b| {
        b.iter(|| {
            let mut map = MapFieldValue::new();
            for (i, key) in keys.iter().enumerate() {
                map.insert(key.as_str(), i as i64);
            }
            black_box(map)
        })
    });

    let map: MapFieldValue = keys.iter().map(|k| (k.as_str(), 1)).collect();
    group.bench_function("lookup_1000", |b| {
        b.iter(|| {
            keys.iter()
                .filter(|k| map.get(k.as_str()).is_some())
                .count()
        })
    });

    group.finish();
}

fn bench_paths(c: &mut Criterion) {
    let document = generate_document(8, 3);
    let path = FieldPath::from_dot_separated("field3.field5.field7.field1").unwrap();

    c.bench_function("get_path_depth_4", |b| {
        b.iter(|| black_box(document.get_path(black_box(&path))))
    });

    c.bench_function("flatten_expand_8x4", |b| {
        b.iter(|| {
            let flat = document.flatten().unwrap();
            black_box(flat.expand())
        })
    });
}

criterion_group!(benches, bench_insert_lookup, bench_paths);
criterion_main!(benches);
