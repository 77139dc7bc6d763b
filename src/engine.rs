use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// A direction to slide the selected tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions, in scan order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    #[inline]
    fn delta(self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unrecognized direction token: {0:?}")]
pub struct ParseMoveError(String);

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Move::Up),
            "down" => Ok(Move::Down),
            "left" => Ok(Move::Left),
            "right" => Ok(Move::Right),
            _ => Err(ParseMoveError(s.to_string())),
        }
    }
}

/// A cell coordinate, row-major with `(0, 0)` in the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// Outcome of a [`Game::move_tile`] call.
///
/// Blocked moves and empty sources are ordinary outcomes, not errors; both
/// leave the game untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The tile merged into the first occupied cell of equal value.
    /// `value` is the doubled value now sitting at `destination`.
    Merged { destination: Position, value: u32 },
    /// The first occupied cell along the direction holds a different value,
    /// or the scan ran off the board edge.
    Blocked,
    /// The source cell is empty.
    NoTile,
}

impl MoveOutcome {
    #[inline]
    pub fn merged(self) -> bool {
        matches!(self, MoveOutcome::Merged { .. })
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("position ({row}, {col}) out of bounds for a {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },
}

/// A `size × size` tile grid stored as a flat row-major vector.
///
/// `0` marks an empty cell; every occupied cell holds a power of two >= 2.
/// A board's size is fixed for its whole lifetime; [`Game`] replaces the
/// board wholesale when it grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<u32>,
}

impl Board {
    /// Construct an empty `size × size` board (all zeros).
    pub fn empty(size: usize) -> Self {
        Board { size, cells: vec![0; size * size] }
    }

    /// Construct a board from explicit rows.
    ///
    /// Escape hatch for tests and tooling. Panics if the rows are not
    /// square or hold a non-zero value that is not a power of two >= 2.
    pub fn from_rows(rows: &[Vec<u32>]) -> Self {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            assert_eq!(row.len(), size, "board rows must form a square grid");
            for &val in row {
                assert!(
                    val == 0 || (val >= 2 && val.is_power_of_two()),
                    "invalid tile value {val}"
                );
                cells.push(val);
            }
        }
        Board { size, cells }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Read-only snapshot of the grid, row-major.
    #[inline]
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Value at `(row, col)`, `0` if empty. Panics out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        assert!(row < self.size && col < self.size, "cell ({row}, {col}) out of bounds");
        self.cells[row * self.size + col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, val: u32) {
        self.cells[row * self.size + col] = val;
    }

    fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Position { row, col }))
    }

    /// The maximum cell value on the board, `0` when empty.
    pub fn highest_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Fraction of cells that are occupied, in `[0, 1]`.
    pub fn filled_ratio(&self) -> f64 {
        let filled = self.cells.iter().filter(|&&v| v != 0).count();
        filled as f64 / (self.size * self.size) as f64
    }

    /// Values eligible for a newly spawned tile.
    ///
    /// `{2, 4}` until the highest tile reaches 8; afterwards every power of
    /// two from 2 up to (but excluding) the highest tile, which keeps late
    /// spawns proportionate to progress.
    pub fn possible_spawn_values(&self) -> Vec<u32> {
        let highest = self.highest_tile();
        if highest < 8 {
            return vec![2, 4];
        }
        let mut vals = Vec::new();
        let mut v = 2;
        while v < highest {
            vals.push(v);
            v *= 2;
        }
        vals
    }

    /// All empty cell positions, row-major.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions().filter(|p| self.get(p.row, p.col) == 0).collect()
    }

    /// First occupied cell reached by scanning from `(row, col)` toward
    /// `dir`, skipping empties. `None` when the scan exits the board.
    fn first_tile_toward(&self, row: usize, col: usize, dir: Move) -> Option<(Position, u32)> {
        let (dr, dc) = dir.delta();
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while r >= 0 && c >= 0 && (r as usize) < self.size && (c as usize) < self.size {
            let val = self.get(r as usize, c as usize);
            if val != 0 {
                return Some((Position { row: r as usize, col: c as usize }, val));
            }
            r += dr;
            c += dc;
        }
        None
    }

    /// True iff the tile at `(row, col)` can merge in some direction.
    ///
    /// A tile is movable when the first occupied cell along at least one
    /// axis-aligned scan (empties skipped) matches its value. This is not
    /// classic 2048 adjacency: a match across an empty gap counts.
    pub fn is_movable(&self, row: usize, col: usize) -> bool {
        let val = self.get(row, col);
        if val == 0 {
            return false;
        }
        Move::ALL
            .iter()
            .any(|&dir| matches!(self.first_tile_toward(row, col, dir), Some((_, v)) if v == val))
    }

    /// All positions holding a movable tile. Hint candidates.
    pub fn movable_positions(&self) -> Vec<Position> {
        self.positions().filter(|p| self.is_movable(p.row, p.col)).collect()
    }

    /// True iff at least one tile is movable.
    pub fn can_move(&self) -> bool {
        self.positions().any(|p| self.is_movable(p.row, p.col))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            if row > 0 {
                writeln!(f, "{}", "-".repeat(8 * self.size - 1))?;
            }
            let line: Vec<String> =
                (0..self.size).map(|col| format_val(self.get(row, col))).collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: u32) -> String {
    if val == 0 {
        " ".repeat(7)
    } else {
        format!("{val:^7}")
    }
}

/// A single game: one board plus the running score.
///
/// Operations that draw randomness take the RNG as a parameter so tests can
/// drive them with a seeded `StdRng`; the convenience constructor
/// [`Game::new`] uses the thread-local RNG.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    score: u64,
}

impl Game {
    /// Number of tiles the controller spawns after a merge.
    pub const SPAWN_BATCH: usize = 2;

    /// Fraction of the board `initialize` fills, and the fullness bound the
    /// controller checks before spawning more tiles after a merge.
    pub const FILL_TARGET: f64 = 0.7;

    /// Construct and initialize a playable game using the thread RNG.
    pub fn new(size: usize) -> Self {
        let mut rng = rand::thread_rng();
        Self::with_rng(size, &mut rng)
    }

    /// Construct and initialize a playable game with the provided RNG.
    ///
    /// Panics if `size < 2`: a smaller board can never satisfy the
    /// playability guarantee.
    ///
    /// ```
    /// use solo_2048::engine::Game;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let game = Game::with_rng(4, &mut rng);
    /// assert!(game.can_move());
    /// assert_eq!(game.score(), 0);
    /// ```
    pub fn with_rng<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        assert!(size >= 2, "board size must be at least 2, got {size}");
        let mut game = Game { board: Board::empty(size), score: 0 };
        game.initialize(rng);
        game
    }

    /// Wrap an existing board with a zero score.
    pub fn from_board(board: Board) -> Self {
        Game { board, score: 0 }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.board.size()
    }

    #[inline]
    pub fn highest_tile(&self) -> u32 {
        self.board.highest_tile()
    }

    #[inline]
    pub fn filled_ratio(&self) -> f64 {
        self.board.filled_ratio()
    }

    #[inline]
    pub fn can_move(&self) -> bool {
        self.board.can_move()
    }

    #[inline]
    pub fn movable_positions(&self) -> Vec<Position> {
        self.board.movable_positions()
    }

    /// True once no tile can merge anywhere. Terminal for this instance;
    /// only constructing a fresh game leaves it.
    #[inline]
    pub fn is_game_over(&self) -> bool {
        !self.board.can_move()
    }

    /// Regenerate the board until it starts in a playable state.
    ///
    /// Each candidate fills `floor(FILL_TARGET · size²)` distinct cells
    /// (unbiased shuffle, first `fill_count` kept) with uniform 2s and 4s,
    /// and is accepted iff `can_move()` holds. The score is untouched.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let size = self.board.size();
        assert!(size >= 2, "board size must be at least 2, got {size}");
        let fill_count = (Self::FILL_TARGET * (size * size) as f64).floor() as usize;
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let mut board = Board::empty(size);
            let mut cells: Vec<Position> = board.positions().collect();
            cells.shuffle(rng);
            for &Position { row, col } in cells.iter().take(fill_count) {
                let val = *[2, 4].choose(rng).unwrap();
                board.set(row, col, val);
            }
            if board.can_move() {
                if attempts > 1 {
                    debug!("initialize: accepted a candidate board after {attempts} attempts");
                }
                self.board = board;
                return;
            }
        }
    }

    /// Slide the tile at `(row, col)` toward `dir` until it merges with the
    /// first occupied cell of equal value.
    ///
    /// The scan skips empty cells; the tile lands directly on the matching
    /// cell, so exactly one merge happens per call and there is no cascade.
    /// An out-of-range position is an error; everything else is a
    /// [`MoveOutcome`].
    ///
    /// ```
    /// use solo_2048::engine::{Board, Game, Move, MoveOutcome, Position};
    /// let board = Board::from_rows(&[
    ///     vec![2, 0, 0, 2],
    ///     vec![0, 0, 0, 0],
    ///     vec![0, 0, 0, 0],
    ///     vec![0, 0, 0, 0],
    /// ]);
    /// let mut game = Game::from_board(board);
    /// let outcome = game.move_tile(0, 0, Move::Right).unwrap();
    /// assert_eq!(
    ///     outcome,
    ///     MoveOutcome::Merged { destination: Position { row: 0, col: 3 }, value: 4 },
    /// );
    /// assert_eq!(game.board().get(0, 0), 0);
    /// assert_eq!(game.score(), 4);
    /// ```
    pub fn move_tile(
        &mut self,
        row: usize,
        col: usize,
        dir: Move,
    ) -> Result<MoveOutcome, EngineError> {
        let size = self.board.size();
        if row >= size || col >= size {
            return Err(EngineError::OutOfBounds { row, col, size });
        }
        let value = self.board.get(row, col);
        if value == 0 {
            return Ok(MoveOutcome::NoTile);
        }
        match self.board.first_tile_toward(row, col, dir) {
            Some((dest, found)) if found == value => {
                let merged = value * 2;
                self.board.set(dest.row, dest.col, merged);
                self.board.set(row, col, 0);
                self.score += u64::from(merged);
                Ok(MoveOutcome::Merged { destination: dest, value: merged })
            }
            _ => Ok(MoveOutcome::Blocked),
        }
    }

    /// Spawn up to `count` tiles on distinct empty cells.
    ///
    /// Positions are drawn uniformly without replacement; each value is an
    /// independent uniform draw from `possible_spawn_values()`, so two
    /// spawned tiles may differ. A full board is a no-op. Returns the
    /// number of tiles placed.
    pub fn spawn_random_tiles<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> usize {
        let empty = self.board.empty_positions();
        if empty.is_empty() {
            return 0;
        }
        let values = self.board.possible_spawn_values();
        let picked: Vec<Position> =
            empty.choose_multiple(rng, count.min(empty.len())).copied().collect();
        for pos in &picked {
            let val = *values.choose(rng).unwrap();
            self.board.set(pos.row, pos.col, val);
        }
        picked.len()
    }

    /// Replace the board with a larger one once the highest tile crosses a
    /// milestone: 64 → 5×5, 512 → 6×6, 2048 → 7×7. One step per call.
    ///
    /// Existing tiles keep their positions in the top-left corner of the
    /// new grid and four fresh tiles are spawned into the added space.
    /// Returns the new size, or `None` when no milestone applies.
    pub fn maybe_expand<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        let size = self.board.size();
        let highest = self.board.highest_tile();
        let new_size = if highest >= 64 && size < 5 {
            5
        } else if highest >= 512 && size < 6 {
            6
        } else if highest >= 2048 && size < 7 {
            7
        } else {
            return None;
        };
        let mut grown = Board::empty(new_size);
        for pos in self.board.positions() {
            grown.set(pos.row, pos.col, self.board.get(pos.row, pos.col));
        }
        debug!("expanding board from {size}x{size} to {new_size}x{new_size}");
        self.board = grown;
        self.spawn_random_tiles(4, rng);
        Some(new_size)
    }
}
