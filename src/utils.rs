use crate::board::{Board, Tile};
use crate::engine::{initialize_game, Game};
use crate::error::{BoardError, LevelError};
use crate::level::Level;

/// Parses an array of string slices into a `Board` object.
///
/// Each string slice in the input array represents a row on the board, starting from row 0,
/// one character per cell. Every row must have the same number of characters.
///
/// Valid characters for tiles are:
/// - `.` Empty, `#` Wall
/// - `^ > v <`: one-way gate blocking its Up / Right / Down / Left side
/// - `D` Door, `k` Key, `$` Coin, `P` Spawn, `F` Flag
/// - `C` Crate, `M` MetalCrate, `I` IceBlock, `O` Crater
/// - `0`-`9`: Bomb with that fuse
/// - `*` Explosion, `+` LittleExplosion
///
/// Any other character will result in an error.
///
/// # Arguments
/// * `s`: A slice of string slices (`&[&str]`) representing the rows of the board,
///   starting from the top (row 0).
///
/// # Returns
/// * `Ok(Board)` if parsing is successful.
/// * `Err(BoardError)` if:
///     - No rows (or only empty rows) are given.
///     - Rows differ in length.
///     - An unrecognized character is encountered.
///
/// # Examples
/// ```
/// use cratepush_solver::utils::board_from_str_array;
/// use cratepush_solver::board::{Position, Tile};
///
/// let board = board_from_str_array(&[
///     "#P$",
///     "#3F",
/// ]).unwrap();
/// assert_eq!(board.cell(Position::new(0, 0)), Tile::Wall);
/// assert_eq!(board.cell(Position::new(1, 0)), Tile::Spawn);
/// assert_eq!(board.cell(Position::new(1, 1)), Tile::Bomb { fuse: 3 });
///
/// assert!(board_from_str_array(&["PX"]).is_err());
/// assert!(board_from_str_array(&["P.", "."]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board, BoardError> {
    let mut rows = Vec::with_capacity(s.len());
    for (r, row_str) in s.iter().enumerate() {
        let row = row_str
            .chars()
            .enumerate()
            .map(|(c, glyph)| {
                Tile::from_char(glyph).ok_or(BoardError::UnknownGlyph { glyph, row: r, col: c })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Board::from_rows(rows)
}

/// Parses rows with `board_from_str_array`, validates them as a level and
/// starts a game on it.
///
/// # Examples
/// ```
/// use cratepush_solver::utils::game_from_str_array;
/// let game = game_from_str_array(&["P$F"]).unwrap();
/// assert_eq!(game.max_coins(), 1);
/// ```
pub fn game_from_str_array(s: &[&str]) -> Result<Game, LevelError> {
    let level = Level::new("untitled", board_from_str_array(s)?)?;
    Ok(initialize_game(&level))
}
