//! solo-2048: a single-tile-merge variant of the 2048 puzzle
//!
//! Unlike classic 2048, a move slides exactly one selected tile: the scan
//! skips empty cells and the tile either merges with the first occupied
//! cell of equal value or does not move at all.
//!
//! This crate provides:
//! - The board/game engine (`engine` module): movement/merge, movable-tile
//!   detection for game-over checks and hints, progress-scaled tile
//!   spawning, playable-board generation, and milestone-driven board growth
//! - A demo binary playing a random policy, and an `arena` binary for
//!   seeded batch self-play
//!
//! Quick start:
//! ```
//! use solo_2048::engine::{Game, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic game setup with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut game = Game::with_rng(4, &mut rng);
//! assert!(game.can_move());
//!
//! // Pick a hint candidate and merge it somewhere
//! let target = game.movable_positions()[0];
//! let merged = Move::ALL
//!     .iter()
//!     .any(|&dir| game.move_tile(target.row, target.col, dir).unwrap().merged());
//! assert!(merged);
//! assert!(game.score() > 0);
//! ```
pub mod engine;
