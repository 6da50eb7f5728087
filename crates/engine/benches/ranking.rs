//! Benchmarks for similarity ranking
//!
//! Run with: cargo bench --package engine
//!
//! Generates a synthetic catalog so the bench does not depend on the real
//! artifacts being present.

use catalog::{Catalog, Movie};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine::Recommender;
use rand::Rng;
use std::sync::Arc;

fn synthetic_catalog(n: usize) -> Arc<Catalog> {
    let movies: Vec<Movie> = (0..n)
        .map(|i| Movie {
            id: i as u32 + 1,
            title: format!("Movie {i}"),
        })
        .collect();

    let mut rng = rand::rng();
    let rows: Vec<Vec<f32>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| if i == j { 1.0 } else { rng.random_range(0.0..1.0) })
                .collect()
        })
        .collect();

    Arc::new(Catalog::from_parts(movies, rows).expect("synthetic catalog is valid"))
}

fn bench_recommend_5k(c: &mut Criterion) {
    let catalog = synthetic_catalog(5000);
    let recommender = Recommender::new(catalog);

    c.bench_function("recommend_top5_5k_catalog", |b| {
        b.iter(|| {
            let results = recommender.recommend(black_box("Movie 42")).unwrap();
            black_box(results)
        })
    });
}

fn bench_recommend_small(c: &mut Criterion) {
    let catalog = synthetic_catalog(500);
    let recommender = Recommender::new(catalog);

    c.bench_function("recommend_top5_500_catalog", |b| {
        b.iter(|| {
            let results = recommender.recommend(black_box("Movie 42")).unwrap();
            black_box(results)
        })
    });
}

criterion_group!(benches, bench_recommend_5k, bench_recommend_small);
criterion_main!(benches);
