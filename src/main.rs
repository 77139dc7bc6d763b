use env_logger::Env;
use rand::seq::SliceRandom;
use solo_2048::engine::{Game, Move};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let mut rng = rand::thread_rng();
    let mut game = Game::new(4);
    println!("{}", game.board());
    let mut move_count = 0u64;
    while !game.is_game_over() {
        let targets = game.movable_positions();
        let Some(&pos) = targets.choose(&mut rng) else {
            break;
        };
        let mut dirs = Move::ALL;
        dirs.shuffle(&mut rng);
        let mut merged = false;
        for dir in dirs {
            let outcome = game.move_tile(pos.row, pos.col, dir).expect("position is in bounds");
            if outcome.merged() {
                merged = true;
                break;
            }
        }
        debug_assert!(merged, "a movable position must merge in some direction");
        move_count += 1;
        if game.filled_ratio() < Game::FILL_TARGET {
            game.spawn_random_tiles(Game::SPAWN_BATCH, &mut rng);
        }
        if let Some(new_size) = game.maybe_expand(&mut rng) {
            println!("Board expanded to {new_size}x{new_size}");
        }
        println!("{}", game.board());
    }
    println!(
        "Moves made: {}, Final score: {}, Highest tile: {}",
        move_count,
        game.score(),
        game.highest_tile()
    );
}
