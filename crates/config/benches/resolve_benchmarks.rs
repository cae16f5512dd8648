//! Benchmarks for settings resolution.
//!
//! Measures globals computation (layering, placeholders) and flat key
//! expansion using public APIs.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use envy_config::{KeyExpander, Mapping, MemorySource, Resolver, Value};

fn layer(prefix: &str, count: usize) -> Mapping {
    (0..count)
        .map(|i| {
            let value = if i % 5 == 0 {
                Value::String(format!("{prefix}-<% key{} %>", (i + 1) % count))
            } else {
                Value::String(format!("{prefix}-value-{i}"))
            };
            (format!("key{i}"), value)
        })
        .collect()
}

fn settings(count: usize) -> Mapping {
    let mut root = Mapping::new();
    root.insert(String::new(), Value::Mapping(layer("default", count)));
    root.insert("prod".to_string(), Value::Mapping(layer("prod", count / 2)));
    root.insert("prod+eu".to_string(), Value::Mapping(layer("eu", count / 4)));
    root
}

fn bench_globals(c: &mut Criterion) {
    let mut group = c.benchmark_group("globals");

    for count in [10, 100, 1000] {
        let root = settings(count);
        group.bench_function(format!("resolve_{count}_keys"), |b| {
            b.iter(|| {
                let resolver = Resolver::builder()
                    .source_with(MemorySource::new(root.clone()))
                    .environments(vec!["", "prod", "eu"])
                    .build()
                    .unwrap_or_default();
                black_box(resolver.globals().len())
            })
        });
    }

    group.finish();
}

fn bench_expansion(c: &mut Criterion) {
    let pairs: Vec<(String, Value)> = (0..500)
        .map(|i| {
            (
                format!("section_{}_group_{}_key_{i}", i % 7, i % 13),
                Value::Integer(i),
            )
        })
        .collect();
    let expander = KeyExpander::default();

    c.bench_function("expand_500_flat_keys", |b| {
        b.iter(|| black_box(expander.expand(pairs.clone())))
    });
}

criterion_group!(benches, bench_globals, bench_expansion);
criterion_main!(benches);
