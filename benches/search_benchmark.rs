use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cachelayer::core::types::DocId;
use cachelayer::index::inverted::TextSearchIndex;
use rand::Rng;

const WORDS: [&str; 12] = [
    "algebra", "geometry", "physics", "biology", "history", "reading",
    "writing", "fractions", "energy", "cells", "maps", "poetry",
];

fn random_text(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_index_documents(c: &mut Criterion) {
    let texts: Vec<String> = (0..1000).map(|_| random_text(50)).collect();

    c.bench_function("index_1000_documents", |b| {
        b.iter(|| {
            let index = TextSearchIndex::new();
            for (i, text) in texts.iter().enumerate() {
                index.add_document(DocId(i as u64 + 1), text).unwrap();
            }
        });
    });
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for doc_count in [100, 1000, 10_000].iter() {
        let index = TextSearchIndex::new();
        for i in 0..*doc_count {
            index.add_document(DocId(i as u64 + 1), &random_text(30)).unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(doc_count), doc_count, |b, _| {
            b.iter(|| index.search(black_box("algebra energy"), 10).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_index_documents, bench_search);
criterion_main!(benches);
