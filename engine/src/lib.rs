//! Core puzzle logic for the Inflynced sliding puzzle: board generation,
//! solvability-preserving shuffle, move application, progress/win
//! evaluation, the game session state machine, and the leaderboard score
//! rules shared by the client and the server.

pub mod board;
pub mod catalog;
pub mod score;
pub mod session;
pub mod shuffle;

pub use board::{Board, Cell, Direction, Tile, GRID_SIZE, TILE_COUNT};
pub use catalog::{puzzle_by_id, random_puzzle, PuzzleEntry, PUZZLE_CATALOG};
pub use score::{
    clean, is_demo, round_time, ScoreEntry, DEMO_USERNAMES, DISPLAY_LIMIT, MAX_TIME_SECS,
    STORE_LIMIT, USERNAME_MAX_LEN,
};
pub use session::{GameSession, MoveOutcome, Phase};
pub use shuffle::{shuffle, ShuffleOutcome, SHUFFLE_MOVES};
