//! Compact text encoding of flat boards.
//!
//! ```text
//! Board := Row ('/' Row)*
//! Row   := Cell (',' Cell)*
//! Cell  := id ('.' extra)*
//! ```
//!
//! A one-way gate lists the ids of its blocked directions as extras, a bomb
//! stores its fuse; every other tile has no extras. Tile ids are given by
//! `Tile::id`, direction ids by `Direction::id`.
use crate::board::{Board, Direction, DirectionSet, Tile};
use crate::error::CodecError;

/// Encodes a board into its compact text form.
///
/// # Examples
/// ```
/// use cratepush_solver::codec::{decode_board, encode_board};
/// use cratepush_solver::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["P3", "#v"]).unwrap();
/// let text = encode_board(&board);
/// assert_eq!(text, "7,10.3/1,9.2");
/// assert_eq!(decode_board(&text).unwrap(), board);
/// ```
pub fn encode_board(board: &Board) -> String {
    board
        .rows()
        .map(|row| row.iter().map(encode_cell).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("/")
}

fn encode_cell(tile: &Tile) -> String {
    let mut out = tile.id().to_string();
    match tile {
        Tile::OneWay { blocked } => {
            for d in blocked.iter() {
                out.push('.');
                out.push_str(&d.id().to_string());
            }
        }
        Tile::Bomb { fuse } => {
            out.push('.');
            out.push_str(&fuse.to_string());
        }
        _ => {}
    }
    out
}

/// Decodes the compact text form back into a board.
///
/// Surrounding whitespace is ignored. The result is rectangular and holds no
/// `Outside` tiles; anything else is reported as a `CodecError`.
pub fn decode_board(input: &str) -> Result<Board, CodecError> {
    let rows = input
        .trim()
        .split('/')
        .enumerate()
        .map(|(row, text)| {
            text.split(',')
                .enumerate()
                .map(|(col, cell)| decode_cell(cell, row, col))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Board::from_rows(rows)?)
}

fn decode_cell(text: &str, row: usize, col: usize) -> Result<Tile, CodecError> {
    let mut fields = text.trim().split('.').map(|field| {
        field.parse::<u32>().map_err(|_| CodecError::InvalidField {
            row,
            col,
            field: field.to_string(),
        })
    });
    // `split` always yields at least one item.
    let id = fields.next().unwrap_or(Ok(0))?;
    let extras = fields.collect::<Result<Vec<_>, _>>()?;

    let unexpected = || CodecError::UnexpectedFields {
        row,
        col,
        id,
        found: extras.len(),
    };

    let tile = match id {
        9 => {
            if extras.len() > 2 {
                return Err(unexpected());
            }
            let mut blocked = DirectionSet::EMPTY;
            for &value in &extras {
                let d = Direction::from_id(value)
                    .ok_or(CodecError::InvalidDirection { row, col, value })?;
                blocked.insert(d);
            }
            Tile::OneWay { blocked }
        }
        10 => match extras.as_slice() {
            [fuse] => Tile::Bomb { fuse: *fuse },
            _ => return Err(unexpected()),
        },
        15 => return Err(CodecError::OutsideTile { row, col }),
        _ => {
            let tile = simple_tile(id).ok_or(CodecError::UnknownTileId { row, col, id })?;
            if !extras.is_empty() {
                return Err(unexpected());
            }
            tile
        }
    };
    Ok(tile)
}

fn simple_tile(id: u32) -> Option<Tile> {
    let tile = match id {
        0 => Tile::Empty,
        1 => Tile::Wall,
        2 => Tile::Door,
        3 => Tile::Key,
        4 => Tile::Crate,
        5 => Tile::Crater,
        6 => Tile::Coin,
        7 => Tile::Spawn,
        8 => Tile::Flag,
        11 => Tile::MetalCrate,
        12 => Tile::IceBlock,
        13 => Tile::Explosion,
        14 => Tile::LittleExplosion,
        _ => return None,
    };
    Some(tile)
}
