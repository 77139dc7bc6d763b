use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use solo_2048::engine::{Game, Move};

/// Deterministic games at a range of densities: freshly initialized boards
/// plus boards advanced through a few merge/spawn rounds.
fn corpus() -> Vec<Game> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut games = Vec::new();
    for seed in 0..8u64 {
        let mut seed_rng = StdRng::seed_from_u64(seed);
        let mut game = Game::with_rng(4, &mut seed_rng);
        games.push(game.clone());
        for _ in 0..6 {
            let targets = game.movable_positions();
            let Some(&pos) = targets.choose(&mut rng) else {
                break;
            };
            for dir in Move::ALL {
                if game.move_tile(pos.row, pos.col, dir).unwrap().merged() {
                    break;
                }
            }
            if game.filled_ratio() < Game::FILL_TARGET {
                game.spawn_random_tiles(Game::SPAWN_BATCH, &mut rng);
            }
            games.push(game.clone());
        }
    }
    games
}

fn bench_queries(c: &mut Criterion) {
    c.bench_function("query/can_move", |bch| {
        let games = corpus();
        bch.iter(|| {
            let mut acc = 0u64;
            for g in &games {
                acc += g.can_move() as u64;
            }
            black_box(acc)
        })
    });
    c.bench_function("query/movable_positions", |bch| {
        let games = corpus();
        bch.iter(|| {
            let mut acc = 0usize;
            for g in &games {
                acc += g.movable_positions().len();
            }
            black_box(acc)
        })
    });
    c.bench_function("query/highest_tile", |bch| {
        let games = corpus();
        bch.iter(|| {
            let mut acc = 0u32;
            for g in &games {
                acc ^= g.highest_tile();
            }
            black_box(acc)
        })
    });
}

fn bench_moves(c: &mut Criterion) {
    c.bench_function("game/move_and_spawn", |bch| {
        bch.iter_batched(
            || {
                let mut rng = StdRng::seed_from_u64(9);
                let game = Game::with_rng(4, &mut rng);
                (game, rng)
            },
            |(mut game, mut rng)| {
                for _ in 0..32 {
                    let targets = game.movable_positions();
                    let Some(&pos) = targets.choose(&mut rng) else {
                        break;
                    };
                    for dir in Move::ALL {
                        if game.move_tile(pos.row, pos.col, dir).unwrap().merged() {
                            break;
                        }
                    }
                    if game.filled_ratio() < Game::FILL_TARGET {
                        game.spawn_random_tiles(Game::SPAWN_BATCH, &mut rng);
                    }
                }
                black_box(game)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_initialize(c: &mut Criterion) {
    c.bench_function("game/initialize", |bch| {
        bch.iter_batched(
            || StdRng::seed_from_u64(7),
            |mut rng| black_box(Game::with_rng(4, &mut rng)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(engine_ops, bench_queries, bench_moves, bench_initialize);
criterion_main!(engine_ops);
