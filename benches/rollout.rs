//! Rollout and search throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cubicup::core::{GameRng, GameState};
use cubicup::mcts::{MCTSConfig, MCTSSearch, RandomRollout, SimulationPolicy};

fn bench_rollout(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollout");
    for size in [4u8, 6, 8] {
        let state = GameState::new(size).unwrap();
        let mut rng = GameRng::new(1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &state, |b, state| {
            b.iter(|| RandomRollout.simulate(black_box(state), &mut rng).unwrap());
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    c.bench_function("search_1000_size_5", |b| {
        b.iter(|| {
            let mut search = MCTSSearch::new(5, MCTSConfig::default()).unwrap();
            search.run(1000).unwrap();
            black_box(search.best_move())
        });
    });
}

criterion_group!(benches, bench_rollout, bench_search);
criterion_main!(benches);
