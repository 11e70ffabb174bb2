//! Error types for the loading boundary.
//!
//! The engine, pathfinder and solver never fail on validated input; everything
//! that can go wrong happens while turning text into a `Board` or a `Level`.

use thiserror::Error;

/// Errors raised while building a rectangular grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board has no cells")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unrecognized character '{glyph}' in row {row} col {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
}

/// Errors raised by `codec::decode_board`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("cell ({row}, {col}): '{field}' is not an unsigned integer")]
    InvalidField {
        row: usize,
        col: usize,
        field: String,
    },
    #[error("cell ({row}, {col}): unknown tile id {id}")]
    UnknownTileId { row: usize, col: usize, id: u32 },
    #[error("cell ({row}, {col}): tile id {id} does not take {found} extra field(s)")]
    UnexpectedFields {
        row: usize,
        col: usize,
        id: u32,
        found: usize,
    },
    #[error("cell ({row}, {col}): {value} is not a direction id")]
    InvalidDirection { row: usize, col: usize, value: u32 },
    #[error("cell ({row}, {col}): the outside sentinel cannot be stored")]
    OutsideTile { row: usize, col: usize },
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Errors raised when a board is promoted to a playable `Level`.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level has no spawn tile")]
    MissingSpawn,
    #[error("level has {count} spawn tiles, expected exactly one")]
    MultipleSpawns { count: usize },
    #[error("level contains an outside tile at ({x}, {y})")]
    OutsideTile { x: i32, y: i32 },
    #[error("one-way tile at ({x}, {y}) blocks {count} sides, at most two are allowed")]
    TooManyBlockedSides { x: i32, y: i32, count: usize },
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("invalid level json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
}
