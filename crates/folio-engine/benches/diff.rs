use criterion::{Criterion, criterion_group, criterion_main};
use folio_engine::{compute_diff, convert_mdx_to_portable_text, diff_versions};
use std::hint::black_box;
mod common;

fn bench_compute_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_diff");
    group.sample_size(20);

    for lines in [50, 200, 500] {
        let (old, new) = common::generate_revision_pair(lines, 7);
        group.bench_function(format!("{lines}_lines"), |b| {
            b.iter(|| {
                let script = compute_diff(black_box(&old), black_box(&new));
                black_box(script);
            });
        });
    }

    group.finish();
}

fn bench_diff_versions(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_versions");
    group.sample_size(20);

    let old = convert_mdx_to_portable_text(&common::generate_mdx_post(20))
        .to_json()
        .unwrap();
    let new = convert_mdx_to_portable_text(&common::generate_mdx_post(22))
        .to_json()
        .unwrap();

    group.bench_function("stored_payloads", |b| {
        b.iter(|| {
            let diff = diff_versions(black_box(&old), black_box(&new)).unwrap();
            black_box(diff);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_compute_diff, bench_diff_versions);
criterion_main!(benches);
