use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use solo_2048::engine::{Game, Move};

#[derive(Debug, Parser)]
#[command(name = "arena", about = "Seeded batch self-play runner for the single-tile 2048 engine")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: u64,

    /// Board size at game start
    #[arg(long, default_value_t = 4)]
    size: usize,

    /// Base RNG seed; game i plays with seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop each game after this many merges
    #[arg(long)]
    steps: Option<u64>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

struct RunStats {
    moves: u64,
    score: u64,
    highest_tile: u32,
    final_size: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let pb = if args.quiet {
        None
    } else {
        let pb = ProgressBar::new(args.games);
        pb.set_style(ProgressStyle::with_template(
            "{spinner} {elapsed_precise} | {pos}/{len} games | {msg}",
        )?);
        Some(pb)
    };

    let mut stats: Vec<RunStats> = Vec::with_capacity(args.games as usize);
    let mut best_score = 0u64;
    for i in 0..args.games {
        let run = run_single_game(args.size, args.seed + i, args.steps);
        best_score = best_score.max(run.score);
        stats.push(run);
        if let Some(pb) = &pb {
            pb.set_position(i + 1);
            pb.set_message(format!("best score: {best_score}"));
        }
    }
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let games = stats.len() as f64;
    let mean_score = stats.iter().map(|s| s.score).sum::<u64>() as f64 / games;
    let mean_moves = stats.iter().map(|s| s.moves).sum::<u64>() as f64 / games;
    let highest_tile = stats.iter().map(|s| s.highest_tile).max().unwrap_or(0);
    let expanded = stats.iter().filter(|s| s.final_size > args.size).count();
    println!(
        "Games: {} | mean score: {:.1} | best score: {} | highest tile: {} | mean moves: {:.1} | games that expanded: {}",
        stats.len(),
        mean_score,
        best_score,
        highest_tile,
        mean_moves,
        expanded
    );
    Ok(())
}

/// Play one game to completion with a uniformly random hint-following
/// policy: pick a random movable tile, merge it in a random direction,
/// then spawn and expand the way the interaction controller does.
fn run_single_game(size: usize, seed: u64, steps: Option<u64>) -> RunStats {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::with_rng(size, &mut rng);
    let mut moves = 0u64;
    while !game.is_game_over() {
        let targets = game.movable_positions();
        let Some(&pos) = targets.choose(&mut rng) else {
            break;
        };
        let mut dirs = Move::ALL;
        dirs.shuffle(&mut rng);
        for dir in dirs {
            let outcome = game.move_tile(pos.row, pos.col, dir).expect("position is in bounds");
            if outcome.merged() {
                break;
            }
        }
        moves += 1;
        if game.filled_ratio() < Game::FILL_TARGET {
            game.spawn_random_tiles(Game::SPAWN_BATCH, &mut rng);
        }
        game.maybe_expand(&mut rng);
        if let Some(limit) = steps {
            if moves >= limit {
                break;
            }
        }
    }
    RunStats {
        moves,
        score: game.score(),
        highest_tile: game.highest_tile(),
        final_size: game.size(),
    }
}
