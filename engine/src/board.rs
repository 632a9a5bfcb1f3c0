//! 3x3 tile grid: generation, adjacency, move application, progress and
//! win evaluation.

use serde::{Deserialize, Serialize};

/// Side length of the grid.
pub const GRID_SIZE: usize = 3;
/// Number of tiles (one cell is always the hole).
pub const TILE_COUNT: usize = GRID_SIZE * GRID_SIZE - 1;

/// A grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another cell.
    pub fn distance(&self, other: Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// A single tile. Its current position is the grid index it sits at; only
/// `home` identifies it, and `home` never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// 1..=8, row-major from the top-left of the solved board.
    pub value: u8,
    /// The cell this tile must occupy for the puzzle to be solved.
    pub home: Cell,
}

/// A direction the empty cell can slide in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    pub fn inverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// The 3x3 board. Exactly one cell holds `None` (the hole); its coordinates
/// are tracked redundantly in `empty` and kept in sync by every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    grid: [[Option<Tile>; GRID_SIZE]; GRID_SIZE],
    empty: Cell,
}

impl Board {
    /// Build the solved board: cell (i, j) holds the tile whose home is
    /// (i, j), except the bottom-right cell which is the hole.
    pub fn solved() -> Self {
        let mut grid = [[None; GRID_SIZE]; GRID_SIZE];
        let mut value = 1u8;
        for (i, row) in grid.iter_mut().enumerate() {
            for (j, slot) in row.iter_mut().enumerate() {
                if i == GRID_SIZE - 1 && j == GRID_SIZE - 1 {
                    continue;
                }
                *slot = Some(Tile {
                    value,
                    home: Cell::new(i, j),
                });
                value += 1;
            }
        }
        Self {
            grid,
            empty: Cell::new(GRID_SIZE - 1, GRID_SIZE - 1),
        }
    }

    pub fn tile(&self, cell: Cell) -> Option<&Tile> {
        self.grid
            .get(cell.row)
            .and_then(|row| row.get(cell.col))
            .and_then(|slot| slot.as_ref())
    }

    pub fn empty_cell(&self) -> Cell {
        self.empty
    }

    /// Whether a click on `cell` is a legal move: exactly one grid step
    /// from the hole.
    pub fn is_adjacent(&self, cell: Cell) -> bool {
        cell.row < GRID_SIZE && cell.col < GRID_SIZE && cell.distance(self.empty) == 1
    }

    /// Swap the tile at `cell` into the hole. Returns false (board
    /// unchanged) if the move is illegal.
    pub fn apply_move(&mut self, cell: Cell) -> bool {
        if !self.is_adjacent(cell) {
            return false;
        }
        let tile = self.grid[cell.row][cell.col].take();
        self.grid[self.empty.row][self.empty.col] = tile;
        self.empty = cell;
        debug_assert!(self.check_invariants());
        true
    }

    /// Cell the hole would move into when sliding in `dir`, if in bounds.
    pub fn empty_target(&self, dir: Direction) -> Option<Cell> {
        let (dr, dc) = dir.offset();
        let row = self.empty.row.checked_add_signed(dr)?;
        let col = self.empty.col.checked_add_signed(dc)?;
        if row < GRID_SIZE && col < GRID_SIZE {
            Some(Cell::new(row, col))
        } else {
            None
        }
    }

    /// Slide the hole one step in `dir`. Returns false if that would leave
    /// the grid.
    pub fn slide_empty(&mut self, dir: Direction) -> bool {
        match self.empty_target(dir) {
            Some(target) => self.apply_move(target),
            None => false,
        }
    }

    /// Directions the hole can currently slide in.
    pub fn legal_directions(&self) -> Vec<Direction> {
        ALL_DIRECTIONS
            .iter()
            .copied()
            .filter(|dir| self.empty_target(*dir).is_some())
            .collect()
    }

    /// Percentage of tiles sitting at their home position, 0..=100. The
    /// hole is excluded from the count.
    pub fn progress(&self) -> f32 {
        let mut correct = 0usize;
        for (i, row) in self.grid.iter().enumerate() {
            for (j, slot) in row.iter().enumerate() {
                if let Some(tile) = slot {
                    if tile.home == Cell::new(i, j) {
                        correct += 1;
                    }
                }
            }
        }
        correct as f32 / TILE_COUNT as f32 * 100.0
    }

    /// All eight tiles at home. The hole's position is unconstrained by
    /// definition, though once the tiles are home it is necessarily at its
    /// own home too.
    pub fn is_solved(&self) -> bool {
        self.grid.iter().enumerate().all(|(i, row)| {
            row.iter().enumerate().all(|(j, slot)| match slot {
                Some(tile) => tile.home == Cell::new(i, j),
                None => true,
            })
        })
    }

    /// Solvability via inversion parity. For an odd-width grid a
    /// permutation is reachable from the solved state iff its inversion
    /// count is even; the shuffler only performs legal slides so this holds
    /// for everything it produces.
    pub fn is_solvable(&self) -> bool {
        let values: Vec<u8> = self
            .grid
            .iter()
            .flatten()
            .filter_map(|slot| slot.map(|t| t.value))
            .collect();
        let mut inversions = 0usize;
        for i in 0..values.len() {
            for j in i + 1..values.len() {
                if values[i] > values[j] {
                    inversions += 1;
                }
            }
        }
        inversions % 2 == 0
    }

    /// Structural invariants: exactly one hole, tracked coordinates match,
    /// each value 1..=8 appears exactly once.
    pub fn check_invariants(&self) -> bool {
        let mut holes = 0usize;
        let mut seen = [false; TILE_COUNT];
        for (i, row) in self.grid.iter().enumerate() {
            for (j, slot) in row.iter().enumerate() {
                match slot {
                    None => {
                        holes += 1;
                        if self.empty != Cell::new(i, j) {
                            return false;
                        }
                    }
                    Some(tile) => {
                        let idx = tile.value as usize;
                        if idx < 1 || idx > TILE_COUNT || seen[idx - 1] {
                            return false;
                        }
                        seen[idx - 1] = true;
                    }
                }
            }
        }
        holes == 1 && seen.iter().all(|s| *s)
    }
}
