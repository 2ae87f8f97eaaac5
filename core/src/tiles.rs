use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::time::Duration;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// How often a redraw is attempted before the previous-position exclusion is
/// dropped and the walk takes any neighbor.
const EXCLUSION_RETRIES: u8 = 8;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TilesState {
    Shuffling,
    Playable,
}

impl TilesState {
    pub const fn is_playable(self) -> bool {
        matches!(self, Self::Playable)
    }
}

/// Outcome of asking a tile to slide into the empty cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SlideOutcome {
    Rejected,
    Moved,
    Solved,
}

impl SlideOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Rejected => false,
            Self::Moved => true,
            Self::Solved => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TilePuzzle {
    config: TilesConfig,
    board: Array2<u8>,
    empty: Coord2,
    state: TilesState,
    pending_shuffle: VecDeque<Coord2>,
    shuffle_clock: Duration,
    slide_lock: Option<Duration>,
    solved: bool,
}

impl TilePuzzle {
    /// Builds the solved board and precomputes the seeded shuffle walk; the
    /// walk is replayed step by step through [`TilePuzzle::update`] so the
    /// player watches the board scramble before it becomes playable.
    pub fn new(config: TilesConfig, seed: u64) -> Result<Self> {
        config.validate()?;

        let side = usize::from(config.side);
        let board = Array2::from_shape_fn((side, side), |(row, col)| (row * side + col) as u8);
        let empty = (config.side - 1, config.side - 1);
        let pending_shuffle = plan_shuffle_walk(&board, empty, config.shuffle_steps, seed);

        Ok(Self {
            config,
            board,
            empty,
            state: TilesState::Shuffling,
            pending_shuffle,
            shuffle_clock: Duration::ZERO,
            slide_lock: None,
            solved: false,
        })
    }

    /// Adopts an explicit board layout, skipping the shuffle. The layout must
    /// be square and hold every tile value exactly once.
    pub fn from_board(config: TilesConfig, board: Array2<u8>) -> Result<Self> {
        config.validate()?;

        let dim = board.dim();
        let side = usize::from(config.side);
        if dim != (side, side) {
            return Err(GameError::InvalidBoardShape);
        }

        let total = mult(config.side, config.side);
        let mut seen = [false; 256];
        for &value in board.iter() {
            if CellCount::from(value) >= total || seen[usize::from(value)] {
                return Err(GameError::DuplicateTile);
            }
            seen[usize::from(value)] = true;
        }

        let empty_value = (total - 1) as u8;
        let empty = board
            .indexed_iter()
            .find(|&(_, &value)| value == empty_value)
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .expect("empty tile present in a full permutation");

        Ok(Self {
            config,
            board,
            empty,
            state: TilesState::Playable,
            pending_shuffle: VecDeque::new(),
            shuffle_clock: Duration::ZERO,
            slide_lock: None,
            solved: false,
        })
    }

    pub fn state(&self) -> TilesState {
        self.state
    }

    pub fn board(&self) -> &Array2<u8> {
        &self.board
    }

    pub fn empty_cell(&self) -> Coord2 {
        self.empty
    }

    /// A slide animation is still playing; new slides are rejected until it
    /// finishes.
    pub fn is_animating(&self) -> bool {
        self.slide_lock.is_some()
    }

    /// Share of cells whose value is exactly one more than their row-major
    /// predecessor, the first cell's predecessor being -1. The solved board
    /// scores 1.0; partial ordering scores proportionally.
    pub fn completion_fraction(&self) -> f32 {
        let mut prev: i16 = -1;
        let mut ordered = 0usize;
        for &value in self.board.iter() {
            if i16::from(value) == prev + 1 {
                ordered += 1;
            }
            prev = i16::from(value);
        }

        ordered as f32 / self.board.len() as f32
    }

    /// Replays pending shuffle steps while shuffling, or counts down the
    /// in-flight slide animation while playable.
    pub fn update(&mut self, dt: Duration) {
        match self.state {
            TilesState::Shuffling => self.advance_shuffle(dt),
            TilesState::Playable => {
                if let Some(remaining) = self.slide_lock {
                    self.slide_lock = (remaining > dt).then(|| remaining - dt);
                }
            }
        }
    }

    /// Asks the tile holding `tile` to slide into the empty cell. Accepted
    /// only while playable, with no slide in flight, and only when the tile
    /// sits orthogonally adjacent to the empty cell; everything else is
    /// rejected without touching the board.
    pub fn slide(&mut self, tile: u8) -> SlideOutcome {
        if !self.state.is_playable() || self.slide_lock.is_some() {
            return SlideOutcome::Rejected;
        }

        let Some(tile_pos) = self.locate(tile) else {
            return SlideOutcome::Rejected;
        };
        if tile_pos == self.empty {
            return SlideOutcome::Rejected;
        }
        if !self.board.iter_neighbors(self.empty).any(|pos| pos == tile_pos) {
            return SlideOutcome::Rejected;
        }

        self.swap_with_empty(tile_pos);
        self.slide_lock = Some(self.config.slide_duration);
        log::trace!("tile {} slid into {:?}", tile, tile_pos);

        if !self.solved && self.completion_fraction() >= self.config.completion_threshold {
            self.solved = true;
            return SlideOutcome::Solved;
        }

        SlideOutcome::Moved
    }

    fn advance_shuffle(&mut self, dt: Duration) {
        if self.config.shuffle_step_interval.is_zero() {
            while let Some(target) = self.pending_shuffle.pop_front() {
                self.swap_with_empty(target);
            }
        } else {
            self.shuffle_clock += dt;
            while self.shuffle_clock >= self.config.shuffle_step_interval {
                self.shuffle_clock -= self.config.shuffle_step_interval;
                match self.pending_shuffle.pop_front() {
                    Some(target) => self.swap_with_empty(target),
                    None => break,
                }
            }
        }

        if self.pending_shuffle.is_empty() {
            self.state = TilesState::Playable;
            self.shuffle_clock = Duration::ZERO;
        }
    }

    fn locate(&self, tile: u8) -> Option<Coord2> {
        self.board
            .indexed_iter()
            .find(|&(_, &value)| value == tile)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    fn swap_with_empty(&mut self, target: Coord2) {
        let value = self.board[target.to_nd_index()];
        self.board[target.to_nd_index()] = self.board[self.empty.to_nd_index()];
        self.board[self.empty.to_nd_index()] = value;
        self.empty = target;
    }
}

/// Random walk of the empty cell over the orthogonal adjacency graph. Each
/// step excludes the position the empty cell came from so the walk cannot
/// trivially undo itself; the exclusion is dropped after a bounded number of
/// redraws so corner configurations cannot stall the plan.
fn plan_shuffle_walk(
    board: &Array2<u8>,
    start: Coord2,
    steps: u16,
    seed: u64,
) -> VecDeque<Coord2> {
    use rand::prelude::*;

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut walk = VecDeque::with_capacity(usize::from(steps));
    let mut empty = start;
    let mut prev: Option<Coord2> = None;

    for _ in 0..steps {
        let neighbors: Vec<Coord2> = board.iter_neighbors(empty).collect();
        let mut choice = neighbors[rng.random_range(0..neighbors.len())];
        let mut retries = 0;
        while Some(choice) == prev {
            if retries >= EXCLUSION_RETRIES {
                log::trace!("shuffle walk exclusion dropped at {:?}", empty);
                break;
            }
            choice = neighbors[rng.random_range(0..neighbors.len())];
            retries += 1;
        }

        walk.push_back(choice);
        prev = Some(empty);
        empty = choice;
    }

    walk
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TilesConfig {
        TilesConfig::default()
    }

    fn solved_board() -> Array2<u8> {
        Array2::from_shape_fn((4, 4), |(row, col)| (row * 4 + col) as u8)
    }

    fn board_with_empty_at(empty: Coord2) -> Array2<u8> {
        let mut board = solved_board();
        let old = board[empty.to_nd_index()];
        board[empty.to_nd_index()] = 15;
        board[(3, 3)] = old;
        board
    }

    fn is_permutation(board: &Array2<u8>) -> bool {
        let mut seen = [false; 16];
        for &value in board.iter() {
            if usize::from(value) >= 16 || seen[usize::from(value)] {
                return false;
            }
            seen[usize::from(value)] = true;
        }
        true
    }

    fn playable(seed: u64) -> TilePuzzle {
        let mut puzzle = TilePuzzle::new(config(), seed).unwrap();
        puzzle.update(Duration::from_secs(60));
        assert!(puzzle.state().is_playable());
        puzzle
    }

    #[test]
    fn slides_are_rejected_while_shuffling() {
        let mut puzzle = TilePuzzle::new(config(), 3).unwrap();

        assert_eq!(puzzle.state(), TilesState::Shuffling);
        assert_eq!(puzzle.slide(14), SlideOutcome::Rejected);
    }

    #[test]
    fn shuffle_replays_over_updates_and_keeps_the_board_a_permutation() {
        let mut puzzle = TilePuzzle::new(config(), 11).unwrap();

        for _ in 0..40 {
            puzzle.update(Duration::from_millis(40));
            assert!(is_permutation(puzzle.board()));
        }

        assert!(puzzle.state().is_playable());
        let empty_value = puzzle.board()[puzzle.empty_cell().to_nd_index()];
        assert_eq!(empty_value, 15);
    }

    #[test]
    fn acceptance_matches_orthogonal_adjacency_for_every_empty_position() {
        for empty_row in 0..4 {
            for empty_col in 0..4 {
                let empty = (empty_row, empty_col);
                for tile in 0..15u8 {
                    let board = board_with_empty_at(empty);
                    let tile_pos = board
                        .indexed_iter()
                        .find(|&(_, &value)| value == tile)
                        .map(|((row, col), _)| (row as Coord, col as Coord))
                        .unwrap();
                    let adjacent = tile_pos.0.abs_diff(empty.0) + tile_pos.1.abs_diff(empty.1) == 1;

                    let mut puzzle = TilePuzzle::from_board(config(), board).unwrap();
                    let accepted = puzzle.slide(tile).has_update();

                    assert_eq!(accepted, adjacent, "tile {tile} against empty {empty:?}");
                }
            }
        }
    }

    #[test]
    fn the_empty_sentinel_itself_never_slides() {
        let mut puzzle = TilePuzzle::from_board(config(), board_with_empty_at((1, 1))).unwrap();

        assert_eq!(puzzle.slide(15), SlideOutcome::Rejected);
    }

    #[test]
    fn accepted_slides_preserve_the_bijection_and_track_the_empty_cell() {
        let mut puzzle = playable(29);

        for tile in 0..16u8 {
            let outcome = puzzle.slide(tile);
            assert!(is_permutation(puzzle.board()));
            assert_eq!(puzzle.board()[puzzle.empty_cell().to_nd_index()], 15);
            if outcome.has_update() {
                puzzle.update(Duration::from_secs(1));
            }
        }
    }

    #[test]
    fn completion_fraction_of_the_solved_board_is_one() {
        let puzzle = TilePuzzle::from_board(config(), solved_board()).unwrap();

        assert_eq!(puzzle.completion_fraction(), 1.0);
    }

    #[test]
    fn a_single_swap_near_the_start_drops_the_fraction_below_one() {
        let mut board = solved_board();
        board[(0, 0)] = 1;
        board[(0, 1)] = 0;
        let puzzle = TilePuzzle::from_board(config(), board).unwrap();

        let fraction = puzzle.completion_fraction();
        assert!(fraction < 1.0);
        assert!(fraction > 0.0);
    }

    #[test]
    fn solving_move_fires_exactly_once() {
        // one slide away from solved: the empty cell sits left of tile 14
        let mut board = solved_board();
        board[(3, 2)] = 15;
        board[(3, 3)] = 14;
        let mut puzzle = TilePuzzle::from_board(config(), board).unwrap();

        assert_eq!(puzzle.slide(14), SlideOutcome::Solved);
        puzzle.update(Duration::from_secs(1));
        assert_eq!(puzzle.slide(14), SlideOutcome::Moved);
    }

    #[test]
    fn a_slide_in_flight_locks_out_new_slides_until_updated() {
        let mut puzzle = TilePuzzle::from_board(config(), board_with_empty_at((1, 1))).unwrap();

        assert!(puzzle.slide(6).has_update());
        assert!(puzzle.is_animating());
        assert_eq!(puzzle.slide(6), SlideOutcome::Rejected);

        puzzle.update(Duration::from_millis(200));
        assert!(!puzzle.is_animating());
        assert!(puzzle.slide(6).has_update());
    }

    #[test]
    fn explicit_boards_are_validated() {
        let flat = Array2::from_shape_fn((2, 8), |(row, col)| (row * 8 + col) as u8);
        assert_eq!(
            TilePuzzle::from_board(config(), flat),
            Err(GameError::InvalidBoardShape)
        );

        let mut duplicated = solved_board();
        duplicated[(0, 0)] = 1;
        assert_eq!(
            TilePuzzle::from_board(config(), duplicated),
            Err(GameError::DuplicateTile)
        );
    }
}
