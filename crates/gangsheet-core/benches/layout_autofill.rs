use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use gangsheet_core::prelude::*;
use image::RgbaImage;

fn generate_artworks(count: usize, min_in: f64, max_in: f64) -> Vec<Artwork> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_in..=max_in);
            let h = rng.gen_range(min_in..=max_in);
            Artwork::with_print_size(format!("art_{i}"), RgbaImage::new(1, 1), w, h)
                .expect("positive size")
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    for count in [50usize, 200, 1000] {
        let arts = generate_artworks(count, 1.0, 12.0);
        group.throughput(Throughput::Elements(count as u64));

        for packing in [PackingPolicy::Shelf, PackingPolicy::Justified] {
            let cfg = RollConfig::builder().packing(packing).build();
            group.bench_with_input(
                BenchmarkId::new(format!("{packing:?}"), count),
                &arts,
                |b, arts| b.iter(|| black_box(compute_layout(arts, &cfg).expect("layout"))),
            );
        }
    }
    group.finish();
}

fn bench_autofill(c: &mut Criterion) {
    let mut group = c.benchmark_group("autofill");

    for count in [10usize, 100] {
        let mut arts = generate_artworks(count, 2.0, 10.0);
        // small last artwork forces many re-simulations
        arts.push(
            Artwork::with_print_size("chip", RgbaImage::new(1, 1), 1.0, 1.0)
                .expect("positive size"),
        );
        let cfg = RollConfig::default();
        group.bench_with_input(BenchmarkId::new("suggest", count), &arts, |b, arts| {
            b.iter(|| black_box(suggest_autofill(arts, &cfg).expect("autofill")))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout, bench_autofill);
criterion_main!(benches);
