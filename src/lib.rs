//! Baghchal-Rust: a Bagh Chal (tigers and goats) rules engine and tiger opponent.
//!
//! Four tigers start on the corners of a 5x5 board. Goats enter one per
//! turn until all twenty are placed, then both sides move along the board's
//! lines. Tigers capture by jumping a goat; five captures win for the
//! tigers, and trapping every tiger wins for the goats.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, game limits and search parameters
//! - [`board`] - The grid, line topology and coordinate notation
//! - [`position`] - Game state and rules (legality, captures, win detection)
//! - [`search`] - Minimax with alpha-beta pruning for the tiger side
//! - [`playout`] - Self-play against a random goat player
//! - [`btp`] - Text command protocol for front ends
//!
//! ## Example
//!
//! ```
//! use baghchal_rust::position::Position;
//! use baghchal_rust::search::TigerBot;
//!
//! // Create a new game and place a goat
//! let mut pos = Position::new();
//! pos.place_goat((1, 1)).unwrap();
//!
//! // Let the tiger answer
//! let mut bot = TigerBot::with_seed(3, 42);
//! let mv = bot.choose_move(&pos).unwrap();
//! pos.apply(mv).unwrap();
//! println!("Tiger plays {mv}");
//! ```

pub mod board;
pub mod btp;
pub mod constants;
pub mod playout;
pub mod position;
pub mod search;
