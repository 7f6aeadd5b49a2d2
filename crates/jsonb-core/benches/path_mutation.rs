use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use jsonb_core::{assign_path, concat, delete_path, set_path, Jsonb, Path};

/// An object with `width` members, each holding a small nested record.
fn wide_doc(width: usize) -> Jsonb {
    Jsonb::object((0..width).map(|i| {
        let record: Jsonb = format!(r#"{{"id":{i},"tags":["x","y"],"meta":{{"n":{i}}}}}"#)
            .parse()
            .unwrap();
        (format!("k{i}"), record)
    }))
}

fn bench_set_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_path");
    for width in [10usize, 100, 1000] {
        let doc = wide_doc(width);
        let path = Path::from_texts([format!("k{}", width / 2), "meta".into(), "n".into()]);
        let value = Jsonb::from(-1);
        group.bench_with_input(BenchmarkId::from_parameter(width), &doc, |b, doc| {
            b.iter(|| set_path(black_box(doc), &path, &value, false).unwrap())
        });
    }
    group.finish();
}

fn bench_delete_and_assign(c: &mut Criterion) {
    let doc = wide_doc(100);
    let existing = Path::from_texts(["k50", "tags", "0"]);
    let missing = Path::from_texts(["new", "3", "leaf"]);

    c.bench_function("delete_path/nested", |b| {
        b.iter(|| delete_path(black_box(&doc), &existing).unwrap())
    });
    c.bench_function("assign_path/gap_fill", |b| {
        b.iter(|| assign_path(black_box(&doc), &missing, &Jsonb::Null).unwrap())
    });
}

fn bench_concat(c: &mut Criterion) {
    let left = wide_doc(100);
    let right = wide_doc(50);
    c.bench_function("concat/objects", |b| {
        b.iter(|| concat(black_box(&left), black_box(&right)).unwrap())
    });
}

criterion_group!(benches, bench_set_path, bench_delete_and_assign, bench_concat);
criterion_main!(benches);
