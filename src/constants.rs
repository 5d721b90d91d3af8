//! Constants for board dimensions, game limits, and search parameters.
//!
//! This module contains all the configuration constants for the engine.
//! The board is a fixed 5x5 grid of intersections addressed by zero-based
//! `(row, col)` pairs.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Bagh Chal is always played on 5x5 intersections.
pub const N: usize = 5;

/// Number of intersections on the board.
pub const BOARDSIZE: usize = N * N;

/// Starting squares of the four tigers (the corners).
pub const TIGER_START: [(usize, usize); 4] = [(0, 0), (0, N - 1), (N - 1, 0), (N - 1, N - 1)];

/// Number of tigers. Tigers are never created or removed.
pub const TIGER_COUNT: usize = 4;

// =============================================================================
// Game Limits
// =============================================================================

/// Goats that enter the board during the placement phase.
pub const TOTAL_GOATS: u8 = 20;

/// Captures that end the game in favour of the tigers.
pub const CAPTURES_TO_WIN: u8 = 5;

/// Maximum self-play length in plies. Movement phase can cycle forever.
pub const MAX_GAME_LEN: usize = 200;

// =============================================================================
// Search Parameters
// =============================================================================

/// Default search depth in plies.
pub const DEFAULT_DEPTH: u32 = 3;

/// Score of a decided game. Tiger wins add the remaining depth on top.
pub const WIN_SCORE: i32 = 10_000;

/// Evaluation weight per captured goat.
pub const CAPTURE_WEIGHT: i32 = 1_000;

/// Evaluation weight per legal tiger move.
pub const MOBILITY_WEIGHT: i32 = 10;

/// Goat placements explored per node during the placement phase.
pub const PLACEMENT_SAMPLE: usize = 5;

// =============================================================================
// Direction Offsets
// =============================================================================

/// Orthogonal steps: North, South, West, East.
pub const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Orthogonal plus diagonal steps (NW, NE, SW, SE), used on points where
/// `row + col` is even.
pub const ALL_DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];
