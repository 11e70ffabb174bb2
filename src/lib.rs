//! # Crate-Push Solver Library
//!
//! This library provides the core game logic for a turn-based, grid-based
//! crate-pushing puzzle and a best-first solver that searches for a winning
//! move sequence.
//!
//! It is used by three binaries:
//! - `human_player`: Allows interactive gameplay via the command line, with
//!   undo, restart and click-to-walk.
//! - `ai_solver`: Takes a level file and an expansion budget, then prints a
//!   winning move sequence if one is found.
//! - `heuristic_evaluator`: Compares the built-in heuristics on seeded random
//!   boards.
//!
//! ## Modules
//! - `board`: Directions, positions, the `Tile` kinds, and the flat (`Board`)
//!   and layered (`LayeredBoard`) grids with the conversions between them.
//! - `codec`: The compact text encoding of a flat board.
//! - `level`: Validated levels and the ASCII, encoded and JSON level formats.
//! - `engine`: Game state (`Game`), the move rules (`do_game_move`) and an
//!   undo/restart `Session`.
//! - `pathfinding`: Breadth-first walks over free floor.
//! - `heuristics`: Pluggable distance estimates and the dead-end check.
//! - `solver`: Best-first search (`solve`, `solve_with_config`).
//! - `error`: Error types returned by the parsing and validation layers.
//! - `utils`: Helpers for building boards and games from string arrays.

pub mod board;
pub mod codec;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod level;
pub mod pathfinding;
pub mod solver;
pub mod utils;

// Items are reached through their module path, e.g.
// `cratepush_solver::solver::solve()`, to keep the crate root small.
