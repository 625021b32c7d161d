use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tennis_core::{
    simulate_batch, standard_game_table, GraphBuilder, MatchSimulator, PointWalker, SimConfig,
};

fn bench_game(c: &mut Criterion) {
    let table = standard_game_table(0.55, 6).unwrap();
    let graph = GraphBuilder::new(&table).build("0-0").unwrap();
    let mut walker = PointWalker::new(&graph, 0, None);
    let mut seed = 0u64;

    c.bench_function("single_game", |b| {
        b.iter(|| {
            seed += 1;
            walker.reset(seed);
            black_box(walker.run().unwrap())
        })
    });
}

fn bench_match(c: &mut Criterion) {
    let table = standard_game_table(0.55, 6).unwrap();
    let graph = GraphBuilder::new(&table).build("0-0").unwrap();
    let config = SimConfig::default();

    c.bench_function("single_match", |b| {
        b.iter(|| MatchSimulator::new(&graph, &config, black_box(42)).unwrap().simulate().unwrap())
    });

    let mut group = c.benchmark_group("batch");
    for count in [10usize, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| simulate_batch(&graph, &config, 7, count).unwrap())
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let table = standard_game_table(0.5, 200).unwrap();
    c.bench_function("graph_build_deep_deuce", |b| {
        b.iter(|| GraphBuilder::new(black_box(&table)).build("0-0").unwrap())
    });
}

criterion_group!(benches, bench_game, bench_match, bench_build);
criterion_main!(benches);
