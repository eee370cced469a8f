use criterion::{Criterion, criterion_group, criterion_main};
use quizdown_engine::parse_questionnaire;
use quizdown_engine::parsing::layout::allocate;
mod common;

fn bench_parse_questionnaire(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(20);

    for (pages, questions) in [(1, 5), (10, 20), (50, 40)] {
        let xml = common::generate_questionnaire(pages, questions);
        group.bench_function(format!("questionnaire_{pages}x{questions}"), |b| {
            b.iter(|| std::hint::black_box(parse_questionnaire(std::hint::black_box(&xml))));
        });
    }

    group.finish();
}

fn bench_allocate(c: &mut Criterion) {
    let widths: Vec<i32> = (0..64).map(|i| if i % 3 == 0 { 5 } else { 0 }).collect();
    c.bench_function("allocate_64", |b| {
        b.iter(|| allocate(std::hint::black_box(widths.iter()), |w| **w));
    });
}

criterion_group!(benches, bench_parse_questionnaire, bench_allocate);
criterion_main!(benches);
