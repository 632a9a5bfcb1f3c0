//! Built-in puzzle catalog: the image assets a board can be generated
//! from. A tile's artwork is the slice of the puzzle image at the tile's
//! home position; rendering layers that cannot load the image fall back to
//! the tile number.

use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleEntry {
    pub id: u32,
    pub image: &'static str,
}

pub const PUZZLE_CATALOG: &[PuzzleEntry] = &[
    PuzzleEntry { id: 1, image: "/images/puzzle1.jpg" },
    PuzzleEntry { id: 2, image: "/images/puzzle2.jpg" },
    PuzzleEntry { id: 3, image: "/images/puzzle3.jpg" },
    PuzzleEntry { id: 4, image: "/images/puzzle4.jpg" },
    PuzzleEntry { id: 5, image: "/images/puzzle5.jpg" },
    PuzzleEntry { id: 6, image: "/images/puzzle6.jpg" },
    PuzzleEntry { id: 7, image: "/images/puzzle7.jpg" },
    PuzzleEntry { id: 8, image: "/images/puzzle8.jpg" },
    PuzzleEntry { id: 9, image: "/images/puzzle9.jpg" },
    PuzzleEntry { id: 10, image: "/images/puzzle10.jpg" },
    PuzzleEntry { id: 11, image: "/images/puzzle11.jpg" },
    PuzzleEntry { id: 12, image: "/images/puzzle12.jpg" },
    PuzzleEntry { id: 13, image: "/images/puzzle13.jpg" },
    PuzzleEntry { id: 14, image: "/images/puzzle14.jpg" },
    PuzzleEntry { id: 15, image: "/images/puzzle15.jpg" },
];

pub fn puzzle_by_id(id: u32) -> Option<&'static PuzzleEntry> {
    PUZZLE_CATALOG.iter().find(|entry| entry.id == id)
}

/// Pick a puzzle at random for a new game.
pub fn random_puzzle<R: Rng + ?Sized>(rng: &mut R) -> &'static PuzzleEntry {
    PUZZLE_CATALOG
        .choose(rng)
        .unwrap_or(&PUZZLE_CATALOG[0])
}
