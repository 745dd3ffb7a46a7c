//! Benchmarks for the feature build and ranking
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic catalog shaped like the movie metadata corpus
//! (~20 genres, a long tail of languages, some missing runtimes).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Catalog, CatalogRecord, IdentifierIndex, ItemId};
use pipeline::{recommend, BuildConfig, FittedFeaturePipeline};

const GENRES: [&str; 20] = [
    "Action", "Adventure", "Animation", "Comedy", "Crime", "Documentary", "Drama", "Family",
    "Fantasy", "Foreign", "History", "Horror", "Music", "Mystery", "Romance", "Science Fiction",
    "TV Movie", "Thriller", "War", "Western",
];

fn synthetic_catalog(size: i64) -> Catalog {
    let mut catalog = Catalog::new();
    for id in 0..size {
        let g = id as usize;
        catalog.insert_record(CatalogRecord {
            id,
            title: format!("Movie {}", id),
            genre_names: vec![
                GENRES[g % GENRES.len()].to_string(),
                GENRES[(g * 7 + 3) % GENRES.len()].to_string(),
            ],
            runtime: (id % 11 != 0).then(|| 60.0 + (id % 120) as f64),
            language: format!("l{}", (id * id) % 40),
            overview: String::new(),
        });
    }
    catalog
}

fn bench_fit_transform(c: &mut Criterion) {
    let catalog = synthetic_catalog(45_000);
    let config = BuildConfig::default();

    c.bench_function("fit_transform_45k", |b| {
        b.iter(|| {
            let built = FittedFeaturePipeline::fit_transform(black_box(&catalog), &config).unwrap();
            black_box(built)
        })
    });
}

fn bench_recommend(c: &mut Criterion) {
    let catalog = synthetic_catalog(45_000);
    let (_, matrix) = FittedFeaturePipeline::fit_transform(&catalog, &BuildConfig::default())
        .expect("Failed to build feature matrix");
    let index = IdentifierIndex::build(&catalog);
    let liked: [ItemId; 5] = [1, 42, 977, 12_000, 31_337];

    c.bench_function("recommend_top15_45k", |b| {
        b.iter(|| {
            let results = recommend(black_box(&liked), black_box(15), &matrix, &index).unwrap();
            black_box(results)
        })
    });
}

criterion_group!(benches, bench_fit_transform, bench_recommend);
criterion_main!(benches);
