//! Validated levels: the loading boundary in front of the engine.
//!
//! A `Level` can only be built from a board that passes validation, so the
//! engine can assume a rectangular board with exactly one spawn and no
//! outside sentinels.
use crate::board::{Board, Position, Tile};
use crate::codec::{decode_board, encode_board};
use crate::error::LevelError;
use crate::utils::board_from_str_array;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A named, validated flat board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LevelFile", into = "LevelFile")]
pub struct Level {
    name: String,
    board: Board,
    spawn: Position,
}

// On-disk shape: the board is stored in its encoded text form.
#[derive(Serialize, Deserialize)]
struct LevelFile {
    name: String,
    board: String,
}

impl TryFrom<LevelFile> for Level {
    type Error = LevelError;

    fn try_from(file: LevelFile) -> Result<Self, Self::Error> {
        Level::new(file.name, decode_board(&file.board)?)
    }
}

impl From<Level> for LevelFile {
    fn from(level: Level) -> Self {
        LevelFile {
            board: encode_board(&level.board),
            name: level.name,
        }
    }
}

/// Text formats a level can be read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LevelFormat {
    /// One glyph per cell, one row per line.
    Ascii,
    /// The compact codec form on a single line.
    Encoded,
    /// `{"name": ..., "board": "<encoded>"}`.
    Json,
}

impl LevelFormat {
    /// Guesses the format of `text`: JSON when it starts with `{`, encoded
    /// when it is a single line made only of codec characters and contains a
    /// separator, ASCII otherwise.
    pub fn detect(text: &str) -> LevelFormat {
        let trimmed = text.trim();
        if trimmed.starts_with('{') {
            LevelFormat::Json
        } else if !trimmed.contains('\n')
            && trimmed.contains([',', '/'])
            && trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '/' | ' '))
        {
            LevelFormat::Encoded
        } else {
            LevelFormat::Ascii
        }
    }
}

impl Level {
    /// Validates `board` and wraps it as a level.
    ///
    /// # Returns
    /// * `Err(LevelError::OutsideTile { .. })` if the board stores the outside sentinel.
    /// * `Err(LevelError::TooManyBlockedSides { .. })` for a one-way gate blocking more than two sides.
    /// * `Err(LevelError::MissingSpawn)` / `Err(LevelError::MultipleSpawns { .. })`
    ///   unless exactly one `Spawn` tile exists.
    pub fn new(name: impl Into<String>, board: Board) -> Result<Self, LevelError> {
        let mut spawns = Vec::new();
        for pos in board.positions() {
            match board.cell(pos) {
                Tile::Outside => return Err(LevelError::OutsideTile { x: pos.x, y: pos.y }),
                Tile::OneWay { blocked } if blocked.len() > 2 => {
                    return Err(LevelError::TooManyBlockedSides {
                        x: pos.x,
                        y: pos.y,
                        count: blocked.len(),
                    })
                }
                Tile::Spawn => spawns.push(pos),
                _ => {}
            }
        }
        let spawn = match spawns.as_slice() {
            [] => return Err(LevelError::MissingSpawn),
            [spawn] => *spawn,
            _ => return Err(LevelError::MultipleSpawns { count: spawns.len() }),
        };
        Ok(Level {
            name: name.into(),
            board,
            spawn,
        })
    }

    /// Reads a level from text in the given format.
    ///
    /// For JSON the embedded name wins over `name`.
    ///
    /// # Examples
    /// ```
    /// use cratepush_solver::level::{Level, LevelFormat};
    /// let ascii = Level::parse("demo", "P.$\n##F\n", LevelFormat::Ascii).unwrap();
    /// let encoded = Level::parse("demo", "7,0,6/1,1,8", LevelFormat::Encoded).unwrap();
    /// assert_eq!(ascii, encoded);
    /// ```
    pub fn parse(name: &str, text: &str, format: LevelFormat) -> Result<Self, LevelError> {
        match format {
            LevelFormat::Ascii => {
                let rows: Vec<&str> = text
                    .lines()
                    .map(str::trim_end)
                    .filter(|line| !line.is_empty())
                    .collect();
                Level::new(name, board_from_str_array(&rows)?)
            }
            LevelFormat::Encoded => Level::new(name, decode_board(text)?),
            LevelFormat::Json => Ok(serde_json::from_str(text)?),
        }
    }

    /// Reads a level from disk, named after the file stem.
    ///
    /// The format is detected from the contents unless one is given.
    pub fn from_file(path: &Path, format: Option<LevelFormat>) -> Result<Self, LevelError> {
        let text = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());
        let format = format.unwrap_or_else(|| LevelFormat::detect(&text));
        Level::parse(&name, &text, format)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The unique spawn position found during validation.
    pub fn spawn(&self) -> Position {
        self.spawn
    }
}
