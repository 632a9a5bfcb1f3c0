//! Solvability-preserving shuffle: a fixed number of random legal slides
//! of the empty cell. Every intermediate state is reachable from the
//! solved board, which is the load-bearing reason a blind random
//! permutation is not used (half of those are unsolvable).

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Cell, Direction};

/// Number of random slides applied to a fresh board.
pub const SHUFFLE_MOVES: usize = 1000;

/// Result of a shuffle: final hole coordinates plus the exact slide
/// sequence, so a replay of the inverse sequence restores the solved board.
#[derive(Debug, Clone)]
pub struct ShuffleOutcome {
    pub empty: Cell,
    pub trace: Vec<Direction>,
}

/// Shuffle `board` in place with `moves` random legal slides drawn from
/// `rng`. Callers wanting reproducibility inject a seeded generator.
pub fn shuffle<R: Rng + ?Sized>(board: &mut Board, rng: &mut R, moves: usize) -> ShuffleOutcome {
    let mut trace = Vec::with_capacity(moves);
    for _ in 0..moves {
        let directions = board.legal_directions();
        if let Some(dir) = directions.choose(rng) {
            board.slide_empty(*dir);
            trace.push(*dir);
        }
    }
    ShuffleOutcome {
        empty: board.empty_cell(),
        trace,
    }
}
