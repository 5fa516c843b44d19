use backed_decode::{DecodingOptions, Path, PathFilter, Resolver};
use backed_test_utils::{stub_document, TestDataGenerator};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_stub_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("stub_paths");
    let doc = stub_document();
    let resolver = Resolver::new(&doc);

    let name = Path::from("full_name").or_else("name").or_else("first_name");
    group.bench_function("alternatives", |b| {
        b.iter(|| black_box(resolver.value::<String>(black_box(&name)).unwrap()));
    });

    let nested = Path::from("attributes").key("values").index(1);
    group.bench_function("key_key_index", |b| {
        b.iter(|| black_box(resolver.value::<i64>(black_box(&nested)).unwrap()));
    });

    let lossy = Path::from("values");
    group.bench_function("lossy_array", |b| {
        b.iter(|| {
            black_box(
                resolver
                    .array::<String>(black_box(&lossy), DecodingOptions::LOSSY)
                    .unwrap(),
            )
        });
    });

    let filtered = Path::from("counts").filter_keys(PathFilter::values(|count: i64| count < 10));
    group.bench_function("filtered_keys", |b| {
        b.iter(|| {
            black_box(
                resolver
                    .array::<String>(black_box(&filtered), DecodingOptions::STRICT)
                    .unwrap(),
            )
        });
    });

    group.finish();
}

fn bench_entry_sets(c: &mut Criterion) {
    let mut group = c.benchmark_group("entry_sets");

    for width in [10, 100, 1000] {
        let doc = TestDataGenerator::wide_document(width);
        let last = Path::root().all_values().index(width - 1);

        group.bench_with_input(BenchmarkId::from_parameter(width), &doc, |b, doc| {
            let resolver = Resolver::new(doc);
            b.iter(|| black_box(resolver.value::<i64>(black_box(&last)).unwrap()));
        });
    }

    group.finish();
}

fn bench_lossy_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("lossy_arrays");

    for len in [100, 10_000] {
        let doc = serde_json::json!({ "items": TestDataGenerator::mixed_array(len) });
        let path = Path::from("items");

        group.bench_with_input(BenchmarkId::from_parameter(len), &doc, |b, doc| {
            let resolver = Resolver::new(doc);
            b.iter(|| {
                black_box(
                    resolver
                        .array::<i64>(black_box(&path), DecodingOptions::LOSSY)
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_stub_paths, bench_entry_sets, bench_lossy_arrays);
criterion_main!(benches);
