use crate::board::{LayeredBoard, Position, Tile};
use crate::solver::SearchState;

/// Signature every pluggable heuristic satisfies.
pub type HeuristicFn = fn(&SearchState) -> u64;

/// The built-in heuristics, selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum HeuristicKind {
    Basic,
    Compound,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 2] = [HeuristicKind::Basic, HeuristicKind::Compound];

    pub fn as_fn(self) -> HeuristicFn {
        match self {
            HeuristicKind::Basic => basic,
            HeuristicKind::Compound => compound,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HeuristicKind::Basic => "basic",
            HeuristicKind::Compound => "compound",
        }
    }
}

fn is_goal(tile: Tile) -> bool {
    matches!(tile, Tile::Coin | Tile::Flag)
}

/// Largest Manhattan distance from the player to any remaining coin or flag.
///
/// Returns 0 when none remain.
pub fn basic(state: &SearchState) -> u64 {
    let player = state.player();
    state
        .board()
        .find_all(|c| is_goal(c.foreground))
        .into_iter()
        .map(|pos| u64::from(player.manhattan(pos)))
        .max()
        .unwrap_or(0)
}

/// `compound` never saturates on boards whose width and height are both at
/// most this.
pub const COMPOUND_EXACT_SIDE: usize = 64;

/// Weighted sum of four terms, highest priority first:
/// 1. coins still on the board,
/// 2. summed distance from the player to those coins (or, once all coins are
///    collected, to the nearest flag),
/// 3. summed distance to keys and doors,
/// 4. crates plus craters.
///
/// Each weight exceeds the largest value every lower-priority term can reach
/// together on this board, so a term only breaks ties of the ones above it.
/// Scores are only comparable between states of the same board size.
///
/// The ordering is exact on boards up to `COMPOUND_EXACT_SIDE` on each side.
/// Past that the arithmetic saturates at `u64::MAX` once enough coins remain,
/// and saturated states compare equal.
pub fn compound(state: &SearchState) -> u64 {
    let board = state.board();
    let player = state.player();
    let area = (board.width() * board.height()) as u64;
    let span = (board.width() + board.height()) as u64;

    let distance_sum = |pred: fn(Tile) -> bool| -> u64 {
        board
            .find_all(|c| pred(c.foreground))
            .into_iter()
            .map(|pos| u64::from(player.manhattan(pos)))
            .sum()
    };

    let coins = board.count_foreground(|t| t == Tile::Coin) as u64;
    let coin_distance = if coins > 0 {
        distance_sum(|t| t == Tile::Coin)
    } else {
        board
            .find_all(|c| c.foreground == Tile::Flag)
            .into_iter()
            .map(|pos| u64::from(player.manhattan(pos)))
            .min()
            .unwrap_or(0)
    };
    let key_distance = distance_sum(|t| matches!(t, Tile::Key | Tile::Door));
    let obstacles = board.count_foreground(|t| matches!(t, Tile::Crate | Tile::Crater)) as u64;

    // w_k = w_{k+1} * (max_{k+1} + 1)
    let obstacle_weight = 1u64;
    let key_weight = obstacle_weight.saturating_mul(area + 1);
    let coin_distance_weight = key_weight.saturating_mul(area.saturating_mul(span) + 1);
    let coin_weight = coin_distance_weight.saturating_mul(area.saturating_mul(span) + 1);

    coins
        .saturating_mul(coin_weight)
        .saturating_add(coin_distance.saturating_mul(coin_distance_weight))
        .saturating_add(key_distance.saturating_mul(key_weight))
        .saturating_add(obstacles.saturating_mul(obstacle_weight))
}

const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

fn is_clearable(tile: Tile) -> bool {
    matches!(
        tile,
        Tile::Empty
            | Tile::Spawn
            | Tile::Coin
            | Tile::Key
            | Tile::Door
            | Tile::Flag
            | Tile::Explosion
            | Tile::LittleExplosion
    )
}

fn is_open_background(tile: Tile) -> bool {
    matches!(tile, Tile::Empty | Tile::OneWay { .. })
}

// A movable block with open floor on both sides along some axis.
fn looks_pushable(board: &LayeredBoard, pos: Position) -> bool {
    let movable = matches!(
        board.tile(pos),
        Tile::Crate | Tile::MetalCrate | Tile::IceBlock | Tile::Bomb { .. }
    );
    movable
        && [((0, -1), (0, 1)), ((-1, 0), (1, 0))]
            .into_iter()
            .any(|((ax, ay), (bx, by))| {
                is_open_background(board.background(Position::new(pos.x + ax, pos.y + ay)))
                    && is_open_background(board.background(Position::new(pos.x + bx, pos.y + by)))
            })
}

/// Local test of whether `pos` could still be walked onto: some cell in its
/// 8-neighborhood is clearable floor or a block that looks pushable.
///
/// This is an approximation in both directions; it is only meant to cut
/// obviously sealed-off goals from the search.
pub fn might_be_reachable(board: &LayeredBoard, pos: Position) -> bool {
    NEIGHBORS_8.iter().any(|&(dx, dy)| {
        let neighbor = Position::new(pos.x + dx, pos.y + dy);
        let cell = board.cell(neighbor);
        (is_clearable(cell.foreground) && cell.background == Tile::Empty)
            || looks_pushable(board, neighbor)
    })
}

/// Whether any remaining coin or flag fails `might_be_reachable`.
///
/// Goals next to the player are always considered reachable.
pub fn is_dead_end(state: &SearchState) -> bool {
    let board = state.board();
    let player = state.player();
    board
        .find_all(|c| is_goal(c.foreground))
        .into_iter()
        .any(|goal| {
            let beside_player = goal.x.abs_diff(player.x) <= 1 && goal.y.abs_diff(player.y) <= 1;
            !beside_player && !might_be_reachable(board, goal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::game_from_str_array;

    fn state(rows: &[&str]) -> SearchState {
        SearchState::from(&game_from_str_array(rows).unwrap())
    }

    #[test]
    fn test_basic_is_max_goal_distance() {
        assert_eq!(basic(&state(&["P...F"])), 4);
        assert_eq!(basic(&state(&["P$..", "...F"])), 4);
        assert_eq!(basic(&state(&["P..$", "F..."])), 3);
        assert_eq!(basic(&state(&["P..."])), 0);
    }

    #[test]
    fn test_compound_prefers_fewer_coins() {
        // Collecting the near coin must beat walking next to the far one.
        let with_coin = state(&["P$.......$F"]);
        let collected = {
            let game = game_from_str_array(&["P$.......$F"]).unwrap();
            let (next, _) = crate::engine::do_game_move(&game, crate::board::Direction::Right);
            SearchState::from(&next)
        };
        assert!(compound(&collected) < compound(&with_coin));
    }

    #[test]
    fn test_compound_term_priority() {
        // Weights scale with the board, so both boards share one size.
        let far_no_crates = state(&["P......$.F"]);
        let near_with_crates = state(&["P$CCCCCC.F"]);
        // Same coin count; coin distance dominates any crate count.
        assert!(compound(&near_with_crates) < compound(&far_no_crates));
    }

    #[test]
    fn test_compound_tracks_flag_after_coins() {
        assert!(compound(&state(&["..PF"])) < compound(&state(&["P..F"])));
        assert_eq!(compound(&state(&["P"])), 0);
    }

    #[test]
    fn test_compound_exact_on_largest_supported_board() {
        use crate::board::{Board, Direction};
        use crate::engine::{do_game_move, initialize_game};
        use crate::level::Level;

        // Every cell but the spawn and the flag holds a coin.
        let side = COMPOUND_EXACT_SIDE;
        let mut board = Board::filled(side, side, Tile::Coin);
        board.set(Position::new(0, 0), Tile::Spawn);
        let corner = side as i32 - 1;
        board.set(Position::new(corner, corner), Tile::Flag);
        let game = initialize_game(&Level::new("large", board).unwrap());
        let before = compound(&SearchState::from(&game));
        assert!(before < u64::MAX);

        let (collected, changed) = do_game_move(&game, Direction::Right);
        assert!(changed);
        assert_eq!(collected.coins(), 1);
        assert!(compound(&SearchState::from(&collected)) < before);
    }

    #[test]
    fn test_enclosed_flag_is_dead_end() {
        let sealed = state(&["P.###", "..#F#", "..###"]);
        assert!(!might_be_reachable(sealed.board(), Position::new(3, 1)));
        assert!(is_dead_end(&sealed));
    }

    #[test]
    fn test_open_goals_are_not_dead_ends() {
        assert!(!is_dead_end(&state(&["P.$", "#.F"])));
    }

    #[test]
    fn test_pushable_crate_keeps_goal_alive() {
        // Every neighbor of the flag is wall except a crate with open floor
        // above and below it.
        let walled = state(&["##P##", "##C##", "##F##", "#####"]);
        assert!(might_be_reachable(walled.board(), Position::new(2, 2)));
        assert!(!is_dead_end(&walled));

        let stuck = state(&["#P###", "##C##", "##F##", "#####"]);
        assert!(!might_be_reachable(stuck.board(), Position::new(2, 2)));
    }

    #[test]
    fn test_goal_beside_player_is_alive() {
        let boxed = state(&["###", "#P#", "#F#", "###"]);
        assert!(!is_dead_end(&boxed));
    }

    #[test]
    fn test_heuristic_kind_dispatch() {
        let s = state(&["P..F"]);
        assert_eq!((HeuristicKind::Basic.as_fn())(&s), basic(&s));
        assert_eq!((HeuristicKind::Compound.as_fn())(&s), compound(&s));
        assert_eq!(HeuristicKind::Compound.name(), "compound");
    }
}
