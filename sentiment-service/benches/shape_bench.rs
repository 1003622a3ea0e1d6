//! Criterion benchmarks for shaping and the result codec.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sentiment_core::types::{Sentence, SentimentResult, SortOrder};
use sentiment_service::{codec, shape};

fn sentences(n: usize) -> Vec<Sentence> {
    (0..n)
        .map(|i| {
            let score = ((i * 37) % 21) as f32 / 10.0 - 1.0;
            Sentence::new(format!("Sentence number {} of the document.", i), score)
        })
        .collect()
}

fn bench_shape(c: &mut Criterion) {
    let mut g = c.benchmark_group("shape");
    for n in [10, 100, 1_000] {
        let input = sentences(n);
        g.bench_with_input(BenchmarkId::new("desc_all", n), &input, |b, input| {
            b.iter(|| black_box(shape(input, SortOrder::Descending, -1)));
        });
        g.bench_with_input(BenchmarkId::new("asc_top3", n), &input, |b, input| {
            b.iter(|| black_box(shape(input, SortOrder::Ascending, 3)));
        });
    }
    g.finish();
}

fn bench_codec(c: &mut Criterion) {
    let result = SentimentResult::from_sentences(sentences(100));
    let bytes = codec::encode(&result).unwrap();

    let mut g = c.benchmark_group("codec");
    g.bench_function("encode_100", |b| b.iter(|| black_box(codec::encode(&result).unwrap())));
    g.bench_function("decode_100", |b| b.iter(|| black_box(codec::decode(&bytes).unwrap())));
    g.finish();
}

criterion_group!(benches, bench_shape, bench_codec);
criterion_main!(benches);
