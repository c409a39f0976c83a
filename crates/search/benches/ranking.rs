//! Benchmarks for query parsing and catalog ranking.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use petfood_search::{compute_match, parse_query, rank_catalog, Lexicon, ProductRecord, RankOptions};

const PROTEINS: &[&str] = &["chicken", "salmon meal", "lamb", "beef liver", "turkey", "duck fat"];
const FILLERS: &[&str] = &["peas", "brown rice", "sweet potatoes", "lentils", "barley", "carrots"];

fn create_catalog(count: usize) -> Vec<ProductRecord> {
    (0..count)
        .map(|i| {
            let protein = PROTEINS[i % PROTEINS.len()];
            let filler = FILLERS[(i / 3) % FILLERS.len()];
            ProductRecord {
                id: format!("p{}", i),
                name: format!("Recipe {} with {}", i, protein),
                brand: "Bench Kitchen".to_string(),
                contains_grain: match i % 3 {
                    0 => Some(true),
                    1 => Some(false),
                    _ => None,
                },
                protein_sources: vec![protein.to_string(), format!("{} meal", protein)],
                ingredients_list: format!("{};{};water;{} meal;vitamin e", protein, filler, protein),
                ..ProductRecord::default()
            }
        })
        .collect()
}

fn bench_parse_query(c: &mut Criterion) {
    let lexicon = Lexicon::builtin();
    c.bench_function("parse_query", |b| {
        b.iter(|| parse_query(black_box("grain free chicken sweet potato -beef"), lexicon))
    });
}

fn bench_compute_match(c: &mut Criterion) {
    let lexicon = Lexicon::builtin();
    let catalog = create_catalog(1);
    let product = &catalog[0];
    let query = parse_query("grain chicken -beef", lexicon);

    c.bench_function("compute_match_single", |b| {
        b.iter(|| compute_match(black_box(product), black_box(&query), lexicon))
    });
}

fn bench_rank_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_catalog");
    let lexicon = Lexicon::builtin();

    for size in [10, 100, 1000, 10000].iter() {
        let catalog = create_catalog(*size);
        group.bench_with_input(BenchmarkId::new("grain_free_chicken", size), size, |b, _| {
            b.iter(|| {
                rank_catalog(
                    black_box(&catalog),
                    black_box("grain free chicken"),
                    lexicon,
                    &RankOptions::default(),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_query, bench_compute_match, bench_rank_catalog);
criterion_main!(benches);
