//! Tile and board model.
//!
//! This module defines the value types every other component works with:
//! - `Direction` / `Position`: grid movement primitives.
//! - `Tile`: the closed set of cell kinds, with kind-specific payloads for
//!   one-way gates and bombs.
//! - `LayeredTile`: a runtime cell split into a foreground and a background.
//! - `Grid<T>`: a rectangular, row-major grid. `Board` is the single-layer
//!   storage form, `LayeredBoard` the runtime form built by `unsqueeze`.
//!
//! Off-board queries return the `Outside` sentinel instead of failing, so
//! neighbor lookups in the move logic never branch on bounds.
use crate::error::BoardError;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four orthogonal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in id order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit offset `(dx, dy)`; `y` grows downwards.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// Stable integer id used by the board codec.
    pub fn id(self) -> u32 {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    pub fn from_id(id: u32) -> Option<Direction> {
        Direction::ALL.get(id as usize).copied()
    }

    /// Single-letter form used when printing move lists (`U`, `R`, `D`, `L`).
    pub fn to_char(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Right => 'R',
            Direction::Down => 'D',
            Direction::Left => 'L',
        }
    }

    /// Inverse of `to_char`, case-insensitive.
    pub fn from_char(c: char) -> Option<Direction> {
        match c.to_ascii_uppercase() {
            'U' => Some(Direction::Up),
            'R' => Some(Direction::Right),
            'D' => Some(Direction::Down),
            'L' => Some(Direction::Left),
            _ => None,
        }
    }

    /// Maps the `w a s d` movement keys.
    pub fn from_key(c: char) -> Option<Direction> {
        match c.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            'd' => Some(Direction::Right),
            's' => Some(Direction::Down),
            'a' => Some(Direction::Left),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A small set of directions, stored as a bitmask.
///
/// Iteration always yields directions in id order, which keeps encoding
/// canonical no matter how the set was built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const EMPTY: DirectionSet = DirectionSet(0);

    pub fn of(directions: &[Direction]) -> Self {
        let mut set = DirectionSet::EMPTY;
        for &d in directions {
            set.insert(d);
        }
        set
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= 1 << direction.id();
    }

    pub fn contains(self, direction: Direction) -> bool {
        self.0 & (1 << direction.id()) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.contains(d))
    }

    /// Raw bitmask, bit `n` set for the direction with id `n`.
    pub fn bits(self) -> u8 {
        self.0
    }
}

/// A cell coordinate. Signed so that off-board neighbors are representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The neighboring position one step in `direction`.
    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.offset();
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Represents the kind of a cell on the board.
///
/// Only `Empty`, `Outside`, `Wall` and `OneWay` may live in the background
/// layer of a `LayeredBoard`; every other kind is a foreground object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Empty,
    /// Boundary sentinel returned for off-board queries. Never persisted.
    Outside,
    Wall,
    /// A gate that rejects entry across any of its `blocked` sides.
    OneWay { blocked: DirectionSet },
    /// A pushable bomb that detonates when `fuse` counts down to zero.
    Bomb { fuse: u32 },
    Door,
    Key,
    Crate,
    Crater,
    Coin,
    Spawn,
    Flag,
    MetalCrate,
    IceBlock,
    Explosion,
    LittleExplosion,
}

impl Tile {
    /// Builds a one-way gate blocking the given sides.
    pub fn one_way(blocked: &[Direction]) -> Tile {
        Tile::OneWay {
            blocked: DirectionSet::of(blocked),
        }
    }

    /// Stable integer id used by the board codec.
    pub fn id(&self) -> u32 {
        match self {
            Tile::Empty => 0,
            Tile::Wall => 1,
            Tile::Door => 2,
            Tile::Key => 3,
            Tile::Crate => 4,
            Tile::Crater => 5,
            Tile::Coin => 6,
            Tile::Spawn => 7,
            Tile::Flag => 8,
            Tile::OneWay { .. } => 9,
            Tile::Bomb { .. } => 10,
            Tile::MetalCrate => 11,
            Tile::IceBlock => 12,
            Tile::Explosion => 13,
            Tile::LittleExplosion => 14,
            Tile::Outside => 15,
        }
    }

    /// Whether this kind belongs in the background layer.
    pub fn is_background(&self) -> bool {
        match self {
            Tile::Empty | Tile::Outside | Tile::Wall | Tile::OneWay { .. } => true,
            Tile::Bomb { .. }
            | Tile::Door
            | Tile::Key
            | Tile::Crate
            | Tile::Crater
            | Tile::Coin
            | Tile::Spawn
            | Tile::Flag
            | Tile::MetalCrate
            | Tile::IceBlock
            | Tile::Explosion
            | Tile::LittleExplosion => false,
        }
    }

    /// Whether a background of this kind admits something travelling in
    /// `direction`.
    ///
    /// A one-way gate rejects travel that would cross one of its blocked
    /// sides: `blocked = [Down]` rejects moving `Up` into the cell and accepts
    /// every other direction. `Wall` and `Outside` are never enterable.
    ///
    /// # Examples
    /// ```
    /// use cratepush_solver::board::{Direction, Tile};
    /// let gate = Tile::one_way(&[Direction::Down]);
    /// assert!(!gate.can_enter(Direction::Up));
    /// assert!(gate.can_enter(Direction::Down));
    /// assert!(Tile::Empty.can_enter(Direction::Left));
    /// assert!(!Tile::Wall.can_enter(Direction::Left));
    /// ```
    pub fn can_enter(&self, direction: Direction) -> bool {
        match self {
            Tile::Empty => true,
            Tile::OneWay { blocked } => !blocked.contains(direction.opposite()),
            _ => false,
        }
    }

    /// Kinds that can be shoved one cell onto an empty floor.
    pub fn is_pushable(&self) -> bool {
        matches!(self, Tile::Crate | Tile::MetalCrate | Tile::Bomb { .. })
    }

    /// Kinds that fill a crater when pushed into it.
    pub fn fills_craters(&self) -> bool {
        matches!(self, Tile::Crate | Tile::IceBlock)
    }

    /// Kinds destroyed by a neighboring detonation.
    pub fn is_explodable(&self) -> bool {
        matches!(self, Tile::Crate | Tile::IceBlock)
    }

    /// Converts the tile to its character representation.
    ///
    /// Bombs print their fuse digit (`B` once the fuse exceeds 9) and one-way
    /// gates print an arrow for their blocked side (`%` when more than one
    /// side is blocked). `Outside` prints as a blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use cratepush_solver::board::{Direction, Tile};
    /// assert_eq!(Tile::Crate.to_char(), 'C');
    /// assert_eq!(Tile::Bomb { fuse: 3 }.to_char(), '3');
    /// assert_eq!(Tile::one_way(&[Direction::Up]).to_char(), '^');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Outside => ' ',
            Tile::Wall => '#',
            Tile::OneWay { blocked } => {
                let mut sides = blocked.iter();
                match (sides.next(), sides.next()) {
                    (Some(Direction::Up), None) => '^',
                    (Some(Direction::Right), None) => '>',
                    (Some(Direction::Down), None) => 'v',
                    (Some(Direction::Left), None) => '<',
                    _ => '%',
                }
            }
            Tile::Bomb { fuse } => char::from_digit(*fuse, 10).unwrap_or('B'),
            Tile::Door => 'D',
            Tile::Key => 'k',
            Tile::Crate => 'C',
            Tile::Crater => 'O',
            Tile::Coin => '$',
            Tile::Spawn => 'P',
            Tile::Flag => 'F',
            Tile::MetalCrate => 'M',
            Tile::IceBlock => 'I',
            Tile::Explosion => '*',
            Tile::LittleExplosion => '+',
        }
    }

    /// Parses a single glyph back into a tile. Returns `None` for glyphs with
    /// no storable tile (`' '`, `'%'`, `'B'` and anything unknown).
    pub fn from_char(c: char) -> Option<Tile> {
        let tile = match c {
            '.' => Tile::Empty,
            '#' => Tile::Wall,
            '^' => Tile::one_way(&[Direction::Up]),
            '>' => Tile::one_way(&[Direction::Right]),
            'v' => Tile::one_way(&[Direction::Down]),
            '<' => Tile::one_way(&[Direction::Left]),
            'D' => Tile::Door,
            'k' => Tile::Key,
            'C' => Tile::Crate,
            'O' => Tile::Crater,
            '$' => Tile::Coin,
            'P' => Tile::Spawn,
            'F' => Tile::Flag,
            'M' => Tile::MetalCrate,
            'I' => Tile::IceBlock,
            '*' => Tile::Explosion,
            '+' => Tile::LittleExplosion,
            digit => Tile::Bomb {
                fuse: digit.to_digit(10)?,
            },
        };
        Some(tile)
    }
}

/// A runtime cell: an interactive foreground object over a structural
/// background.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayeredTile {
    pub foreground: Tile,
    pub background: Tile,
}

impl LayeredTile {
    pub const EMPTY: LayeredTile = LayeredTile {
        foreground: Tile::Empty,
        background: Tile::Empty,
    };

    /// Sorts a flat tile into the layer it belongs to, defaulting the other
    /// layer to `Empty`.
    pub fn from_flat(tile: Tile) -> Self {
        if tile.is_background() {
            LayeredTile {
                foreground: Tile::Empty,
                background: tile,
            }
        } else {
            LayeredTile {
                foreground: tile,
                background: Tile::Empty,
            }
        }
    }

    /// The single tile a flat board stores for this cell: the foreground when
    /// occupied, the background otherwise.
    pub fn to_flat(self) -> Tile {
        if self.foreground == Tile::Empty {
            self.background
        } else {
            self.foreground
        }
    }
}

/// Cell types that provide an off-board sentinel.
pub trait Cell: Copy {
    const OUTSIDE: Self;
}

impl Cell for Tile {
    const OUTSIDE: Self = Tile::Outside;
}

impl Cell for LayeredTile {
    const OUTSIDE: Self = LayeredTile {
        foreground: Tile::Outside,
        background: Tile::Outside,
    };
}

/// A rectangular grid stored row-major. Every row has exactly `width` cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// Single-layer storage board.
pub type Board = Grid<Tile>;

/// Dual-layer runtime board.
pub type LayeredBoard = Grid<LayeredTile>;

impl<T: Cell> Grid<T> {
    /// Creates a `width` x `height` grid with every cell set to `cell`.
    pub fn filled(width: usize, height: usize, cell: T) -> Self {
        Grid {
            width,
            height,
            cells: vec![cell; width * height],
        }
    }

    /// Builds a grid from rows, checking that the result is rectangular and
    /// non-empty.
    ///
    /// # Returns
    /// * `Err(BoardError::Empty)` if there are no rows or the first row is empty.
    /// * `Err(BoardError::Ragged { .. })` if any row length differs from the first.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, BoardError> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(BoardError::Empty);
        }
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for (row, cells_in_row) in rows.into_iter().enumerate() {
            if cells_in_row.len() != width {
                return Err(BoardError::Ragged {
                    row,
                    expected: width,
                    found: cells_in_row.len(),
                });
            }
            cells.extend(cells_in_row);
        }
        Ok(Grid {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width + pos.x as usize)
    }

    /// Bounds-checked lookup.
    pub fn get(&self, pos: Position) -> Option<T> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Lookup that answers `T::OUTSIDE` for off-board positions.
    pub fn cell(&self, pos: Position) -> T {
        self.get(pos).unwrap_or(T::OUTSIDE)
    }

    /// Overwrites the cell at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is outside the grid.
    pub fn set(&mut self, pos: Position, cell: T) {
        match self.index(pos) {
            Some(i) => self.cells[i] = cell,
            None => panic!(
                "position {pos} outside {}x{} grid",
                self.width, self.height
            ),
        }
    }

    /// Exactly `height` rows, each `width` cells long (possibly empty).
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        let width = self.width;
        (0..self.height).map(move |r| &self.cells[r * width..(r + 1) * width])
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (0..self.cells.len()).map(move |i| Position::new((i % width) as i32, (i / width) as i32))
    }

    /// Positions of all cells matching `pred`, in row-major order.
    pub fn find_all(&self, pred: impl Fn(&T) -> bool) -> Vec<Position> {
        self.positions()
            .zip(self.cells.iter())
            .filter(|(_, cell)| pred(cell))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Copies rows `row_start..row_end` (clamped to the grid) into a new grid.
    pub fn slice(&self, row_start: usize, row_end: usize) -> Grid<T> {
        let end = row_end.min(self.height);
        let start = row_start.min(end);
        Grid {
            width: self.width,
            height: end - start,
            cells: self.cells[start * self.width..end * self.width].to_vec(),
        }
    }

    pub fn map<U: Cell>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(|&c| f(c)).collect(),
        }
    }
}

impl Grid<LayeredTile> {
    /// Foreground at `pos`, or `Outside` off the board.
    pub fn tile(&self, pos: Position) -> Tile {
        self.cell(pos).foreground
    }

    /// # Panics
    /// Panics if `pos` is outside the board.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) {
        let mut cell = self.cell(pos);
        cell.foreground = tile;
        self.set(pos, cell);
    }

    /// Background at `pos`, or `Outside` off the board.
    pub fn background(&self, pos: Position) -> Tile {
        self.cell(pos).background
    }

    /// # Panics
    /// Panics if `pos` is outside the board.
    pub fn set_background(&mut self, pos: Position, tile: Tile) {
        let mut cell = self.cell(pos);
        cell.background = tile;
        self.set(pos, cell);
    }

    /// Number of foreground cells matching `pred`.
    pub fn count_foreground(&self, pred: impl Fn(Tile) -> bool) -> usize {
        self.cells.iter().filter(|c| pred(c.foreground)).count()
    }
}

/// Splits a flat board into foreground and background layers.
pub fn unsqueeze(board: &Board) -> LayeredBoard {
    board.map(LayeredTile::from_flat)
}

/// Collapses a layered board back into its storage form.
pub fn squeeze(board: &LayeredBoard) -> Board {
    board.map(LayeredTile::to_flat)
}

// Picks a random tile for the interior of a generated board. Spawns and
// flags are placed separately so that each board has exactly one spawn.
fn generate_random_tile(rng: &mut impl Rng) -> Tile {
    match rng.gen_range(0..40u8) {
        0..=17 => Tile::Empty,
        18..=23 => Tile::Wall,
        24..=25 => Tile::Crate,
        26 => Tile::MetalCrate,
        27 => Tile::IceBlock,
        28..=29 => Tile::Crater,
        30..=31 => Tile::Coin,
        32 => Tile::Key,
        33 => Tile::Door,
        34 => Tile::Bomb {
            fuse: rng.gen_range(1..=9),
        },
        35 => {
            let first = Direction::ALL[rng.gen_range(0..4)];
            if rng.gen_bool(0.25) {
                Tile::one_way(&[first, first.opposite()])
            } else {
                Tile::one_way(&[first])
            }
        }
        _ => Tile::Empty,
    }
}

impl Board {
    /// Creates a walled board with random contents from a seed.
    ///
    /// The same `(width, height, seed)` always produces the same board. The
    /// border is solid wall, the interior holds random tiles, and exactly one
    /// `Spawn` and one `Flag` are placed on distinct interior cells. Sizes
    /// below 3x4 are raised to that minimum so the interior has room for both.
    pub fn new_random_with_seed(width: usize, height: usize, seed: u64) -> Self {
        let width = width.max(3);
        let height = height.max(4);
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = Board::filled(width, height, Tile::Wall);

        let interior: Vec<Position> = board
            .positions()
            .filter(|p| {
                p.x > 0 && p.y > 0 && (p.x as usize) < width - 1 && (p.y as usize) < height - 1
            })
            .collect();
        for &pos in &interior {
            board.set(pos, generate_random_tile(&mut rng));
        }

        let spawn = interior[rng.gen_range(0..interior.len())];
        let flag = loop {
            let candidate = interior[rng.gen_range(0..interior.len())];
            if candidate != spawn {
                break candidate;
            }
        };
        board.set(spawn, Tile::Spawn);
        board.set(flag, Tile::Flag);
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.rows().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for tile in row {
                write!(f, "{}", tile.to_char())?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for LayeredBoard {
    /// Shows the foreground where occupied and the background elsewhere.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", squeeze(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::board_from_str_array;

    #[test]
    fn test_direction_offsets_and_opposites() {
        for d in Direction::ALL {
            let (dx, dy) = d.offset();
            let (ox, oy) = d.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert_eq!(Direction::from_id(d.id()), Some(d));
        }
        assert_eq!(Direction::from_id(4), None);
        assert_eq!(Direction::from_key('w'), Some(Direction::Up));
        assert_eq!(Direction::from_key('d'), Some(Direction::Right));
        assert_eq!(Direction::from_char('d'), Some(Direction::Down));
        assert_eq!(Direction::from_char('R'), Some(Direction::Right));
    }

    #[test]
    fn test_direction_set_iterates_in_id_order() {
        let set = DirectionSet::of(&[Direction::Left, Direction::Up, Direction::Left]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Direction::Up, Direction::Left]);
        assert!(!set.contains(Direction::Down));
    }

    #[test]
    fn test_one_way_entry_rule() {
        let gate = Tile::one_way(&[Direction::Down]);
        assert!(!gate.can_enter(Direction::Up));
        assert!(gate.can_enter(Direction::Down));
        assert!(gate.can_enter(Direction::Left));
        assert!(gate.can_enter(Direction::Right));
        assert!(!Tile::Outside.can_enter(Direction::Up));
    }

    #[test]
    fn test_out_of_bounds_returns_sentinel() {
        let board = board_from_str_array(&["P.", ".#"]).unwrap();
        assert!(board.in_bounds(Position::new(1, 1)));
        assert!(!board.in_bounds(Position::new(2, 0)));
        assert!(!board.in_bounds(Position::new(0, -1)));
        assert_eq!(board.get(Position::new(-1, 0)), None);
        assert_eq!(board.cell(Position::new(-1, 0)), Tile::Outside);
        assert_eq!(board.cell(Position::new(1, 1)), Tile::Wall);
    }

    #[test]
    #[should_panic]
    fn test_set_out_of_bounds_panics() {
        let mut board = Board::filled(2, 2, Tile::Empty);
        board.set(Position::new(2, 0), Tile::Wall);
    }

    #[test]
    fn test_from_rows_rejects_ragged_and_empty() {
        let ragged = Board::from_rows(vec![vec![Tile::Empty; 3], vec![Tile::Empty; 2]]);
        assert_eq!(
            ragged,
            Err(BoardError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(Board::from_rows(Vec::new()), Err(BoardError::Empty));
    }

    #[test]
    fn test_clone_is_independent() {
        let board = unsqueeze(&board_from_str_array(&["PC."]).unwrap());
        let mut copy = board.clone();
        copy.set_tile(Position::new(1, 0), Tile::Empty);
        assert_eq!(board.tile(Position::new(1, 0)), Tile::Crate);
        assert_eq!(copy.tile(Position::new(1, 0)), Tile::Empty);
    }

    #[test]
    fn test_unsqueeze_sorts_layers() {
        let flat = board_from_str_array(&["#C>", "3.$"]).unwrap();
        let layered = unsqueeze(&flat);
        assert_eq!(layered.background(Position::new(0, 0)), Tile::Wall);
        assert_eq!(layered.tile(Position::new(0, 0)), Tile::Empty);
        assert_eq!(layered.tile(Position::new(1, 0)), Tile::Crate);
        assert_eq!(layered.background(Position::new(1, 0)), Tile::Empty);
        assert_eq!(
            layered.background(Position::new(2, 0)),
            Tile::one_way(&[Direction::Right])
        );
        assert_eq!(layered.tile(Position::new(0, 1)), Tile::Bomb { fuse: 3 });
        assert_eq!(squeeze(&layered), flat);
    }

    #[test]
    fn test_slice_copies_rows() {
        let board = board_from_str_array(&["P..", "###", "$$$"]).unwrap();
        let window = board.slice(1, 3);
        assert_eq!(window.height(), 2);
        assert_eq!(window.cell(Position::new(0, 0)), Tile::Wall);
        assert_eq!(window.cell(Position::new(2, 1)), Tile::Coin);
        assert_eq!(board.slice(2, 10).height(), 1);
    }

    #[test]
    fn test_char_round_trip() {
        for c in ".#^>v<DkCO$PFMI*+0123456789".chars() {
            let tile = Tile::from_char(c).unwrap();
            assert_eq!(tile.to_char(), c);
        }
        assert_eq!(Tile::from_char('x'), None);
        assert_eq!(Tile::Bomb { fuse: 12 }.to_char(), 'B');
    }

    #[test]
    fn test_display_board() {
        let board = board_from_str_array(&["#P#", "$.F"]).unwrap();
        assert_eq!(board.to_string(), "#P#\n$.F");
    }

    #[test]
    fn test_zero_width_grid_has_empty_rows() {
        let board = Board::filled(0, 2, Tile::Empty);
        assert_eq!(board.rows().count(), 2);
        assert!(board.rows().all(|row| row.is_empty()));
        assert_eq!(board.to_string(), "\n");
        assert_eq!(crate::codec::encode_board(&board), "/");
    }

    #[test]
    fn test_new_random_with_seed_determinism() {
        let board1 = Board::new_random_with_seed(9, 7, 123);
        let board2 = Board::new_random_with_seed(9, 7, 123);
        assert_eq!(board1, board2, "Boards with the same seed must be identical.");
        let board3 = Board::new_random_with_seed(9, 7, 124);
        assert_ne!(board1, board3, "Boards with different seeds should differ.");
    }

    #[test]
    fn test_new_random_board_shape() {
        for seed in 0..20 {
            let board = Board::new_random_with_seed(8, 6, seed);
            assert_eq!((board.width(), board.height()), (8, 6));
            assert_eq!(board.find_all(|t| *t == Tile::Spawn).len(), 1);
            assert_eq!(board.find_all(|t| *t == Tile::Flag).len(), 1);
            for x in 0..8 {
                assert_eq!(board.cell(Position::new(x, 0)), Tile::Wall);
                assert_eq!(board.cell(Position::new(x, 5)), Tile::Wall);
            }
        }
    }
}
