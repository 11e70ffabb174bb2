//! Breadth-first reachability over free floor.
//!
//! Used for click-to-walk and by the solver to collapse a walk to a key or
//! coin into a single search edge. Only floor the player can cross without
//! disturbing anything counts as free: empty cells and the spawn marker, plus
//! coins, keys and one-way gates when the caller opts in.
use crate::board::{Direction, LayeredBoard, Position, Tile};
use crate::engine::Game;
use std::collections::{HashMap, VecDeque};

/// Neighbor expansion order. Fixed so that returned paths are deterministic.
pub const SEARCH_ORDER: [Direction; 4] = [
    Direction::Right,
    Direction::Left,
    Direction::Down,
    Direction::Up,
];

/// Optional kinds the pathfinder may walk through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PathOptions {
    pub through_coins: bool,
    pub through_keys: bool,
    pub through_one_way: bool,
}

impl PathOptions {
    /// Everything optional allowed; what the solver uses for macro moves.
    pub fn permissive() -> Self {
        PathOptions {
            through_coins: true,
            through_keys: true,
            through_one_way: true,
        }
    }
}

fn is_free(board: &LayeredBoard, pos: Position, direction: Direction, options: PathOptions) -> bool {
    let foreground_ok = match board.tile(pos) {
        Tile::Empty | Tile::Spawn => true,
        Tile::Coin => options.through_coins,
        Tile::Key => options.through_keys,
        _ => false,
    };
    let background_ok = match board.background(pos) {
        Tile::Empty => true,
        gate @ Tile::OneWay { .. } => options.through_one_way && gate.can_enter(direction),
        _ => false,
    };
    foreground_ok && background_ok
}

/// The result of a flood from the player position.
///
/// Each reached cell remembers the cell and direction it was first entered
/// from, so any reached cell's shortest path can be rebuilt.
#[derive(Clone, Debug)]
pub struct Reachability {
    start: Position,
    came_from: HashMap<Position, (Position, Direction)>,
}

impl Reachability {
    pub fn contains(&self, pos: Position) -> bool {
        pos == self.start || self.came_from.contains_key(&pos)
    }

    /// Reached positions other than the start, in no particular order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.came_from.keys().copied()
    }

    /// Directions leading from the start to `target`, or `None` if it was
    /// never reached.
    pub fn path_to(&self, target: Position) -> Option<Vec<Direction>> {
        if !self.contains(target) {
            return None;
        }
        let mut path = Vec::new();
        let mut current = target;
        while current != self.start {
            let (previous, direction) = self.came_from[&current];
            path.push(direction);
            current = previous;
        }
        path.reverse();
        Some(path)
    }
}

// A cell is recorded the first time it is confirmed enterable from some
// direction. The cells reachable from a position do not depend on how it was
// entered, so later approaches never reveal anything new.
fn flood(game: &Game, options: PathOptions, target: Option<Position>) -> Reachability {
    let board = game.board();
    let start = game.player();
    let mut came_from = HashMap::new();
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        if Some(current) == target {
            break;
        }
        for direction in SEARCH_ORDER {
            let next = current.step(direction);
            if next == start || came_from.contains_key(&next) {
                continue;
            }
            if is_free(board, next, direction, options) {
                came_from.insert(next, (current, direction));
                queue.push_back(next);
            }
        }
    }
    Reachability { start, came_from }
}

/// Finds a walk from the player to `(x, y)` over free floor.
///
/// # Returns
/// * `Some(path)` with the directions of a shortest walk; empty if the target
///   is the player's own cell.
/// * `None` if the target is off the board, not free, or cut off.
///
/// # Examples
/// ```
/// use cratepush_solver::board::Direction;
/// use cratepush_solver::pathfinding::{can_move_to, PathOptions};
/// use cratepush_solver::utils::game_from_str_array;
///
/// let game = game_from_str_array(&["P.#", "..."]).unwrap();
/// let path = can_move_to(&game, 2, 1, PathOptions::default()).unwrap();
/// assert_eq!(path, vec![Direction::Right, Direction::Down, Direction::Right]);
/// assert_eq!(can_move_to(&game, 2, 0, PathOptions::default()), None);
/// ```
pub fn can_move_to(game: &Game, x: i32, y: i32, options: PathOptions) -> Option<Vec<Direction>> {
    let target = Position::new(x, y);
    if target == game.player() {
        return Some(Vec::new());
    }
    if !game.board().in_bounds(target) {
        return None;
    }
    flood(game, options, Some(target)).path_to(target)
}

/// Floods every cell reachable from the player.
pub fn reachable_positions(game: &Game, options: PathOptions) -> Reachability {
    flood(game, options, None)
}
