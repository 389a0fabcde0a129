use criterion::{criterion_group, criterion_main, Criterion, black_box};
use negabot::search::eval::Evaluator;
use negabot::Position;

fn bench_eval(c: &mut Criterion) {
    let b = Position::startpos();
    let e = Evaluator::default();
    c.bench_function("evaluate_startpos", |ben| {
        ben.iter(|| {
            let v = e.evaluate(black_box(&b));
            black_box(v)
        })
    });
}

criterion_group!(benches, bench_eval);
criterion_main!(benches);
