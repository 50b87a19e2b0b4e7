use criterion::{black_box, criterion_group, criterion_main, Criterion};

use exam_concepts::dictionary::ConceptDictionary;
use exam_concepts::extractor::{ConceptExtractor, HybridConfig, HybridExtractor, KnowledgeBaseExtractor};
use exam_concepts::ranker::{KeywordRanker, RakeRanker};

const QUESTION: &str = "Discuss the impact of monetary policy and fiscal policy on inflation \
                        and unemployment during the Mughal period of trade expansion.";

fn questions(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Question {i}: {QUESTION}")).collect()
}

fn hybrid() -> HybridExtractor {
    let dictionary = ConceptDictionary::from_pairs([
        ("monetary policy", "Monetary Policy"),
        ("fiscal policy", "Fiscal Policy"),
        ("inflation", "Inflation"),
        ("unemployment", "Labour Economics"),
        ("mughal", "Mughal Empire"),
    ]);
    HybridExtractor::new(HybridConfig::default(), dictionary).unwrap()
}

fn bench_rake(c: &mut Criterion) {
    let ranker = RakeRanker::default();
    c.bench_function("rake_rank", |bench| {
        bench.iter(|| black_box(ranker.rank(black_box(QUESTION))))
    });
}

fn bench_hybrid(c: &mut Criterion) {
    let ex = hybrid();
    c.bench_function("hybrid_extract", |bench| {
        bench.iter(|| black_box(ex.extract(black_box(QUESTION))))
    });
}

fn bench_knowledge_base(c: &mut Criterion) {
    let ex = KnowledgeBaseExtractor::builtin().unwrap();
    c.bench_function("knowledge_base_extract", |bench| {
        bench.iter(|| black_box(ex.extract(black_box(QUESTION))))
    });
}

fn bench_batch(c: &mut Criterion) {
    let ex = hybrid();
    let texts = questions(500);
    c.bench_function("hybrid_extract_batch_500", |bench| {
        bench.iter(|| black_box(ex.extract_batch(black_box(&texts))))
    });
}

criterion_group!(benches, bench_rake, bench_hybrid, bench_knowledge_base, bench_batch);
criterion_main!(benches);
