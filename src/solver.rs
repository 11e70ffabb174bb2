//! Best-first search for a winning move sequence.
//!
//! Nodes live in a contiguous arena and the frontier is a min-heap of
//! `(priority, arena index)` pairs. Successors are the four single-step moves
//! plus one macro move per key or coin the player can walk to, which collapses
//! the whole walk into one edge.
use crate::board::{Direction, LayeredBoard, Position, Tile};
use crate::engine::{do_game_move, Game};
use crate::heuristics::is_dead_end;
use crate::pathfinding::{reachable_positions, PathOptions};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use xxhash_rust::xxh3::xxh3_64;

/// Expansion budget used when none is given.
pub const DEFAULT_EXPANSION_BUDGET: usize = 100_000;

/// The part of a `Game` the search cares about: no sound, no history.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SearchState {
    board: LayeredBoard,
    player: Position,
    coins: u32,
    max_coins: u32,
    keys: u32,
    won: bool,
}

impl From<&Game> for SearchState {
    fn from(game: &Game) -> Self {
        SearchState {
            board: game.board().clone(),
            player: game.player(),
            coins: game.coins(),
            max_coins: game.max_coins(),
            keys: game.keys(),
            won: game.won(),
        }
    }
}

fn push_tile(buf: &mut Vec<u8>, tile: Tile) {
    let payload = match tile {
        Tile::OneWay { blocked } => u32::from(blocked.bits()),
        Tile::Bomb { fuse } => fuse,
        _ => 0,
    };
    buf.extend_from_slice(&tile.id().to_le_bytes());
    buf.extend_from_slice(&payload.to_le_bytes());
}

impl SearchState {
    pub fn board(&self) -> &LayeredBoard {
        &self.board
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn max_coins(&self) -> u32 {
        self.max_coins
    }

    pub fn keys(&self) -> u32 {
        self.keys
    }

    pub fn won(&self) -> bool {
        self.won
    }

    /// A playable `Game` with empty history and no sound.
    pub fn to_game(&self) -> Game {
        Game::from_parts(
            self.board.clone(),
            self.player,
            self.coins,
            self.max_coins,
            self.keys,
            self.won,
        )
    }

    /// 64-bit structural hash over board contents, player, coins, keys and
    /// the win flag. Used as the deduplication key.
    pub fn fingerprint(&self) -> u64 {
        let mut buf = Vec::with_capacity(self.board.width() * self.board.height() * 16 + 32);
        buf.extend_from_slice(&(self.board.width() as u64).to_le_bytes());
        for row in self.board.rows() {
            for cell in row {
                push_tile(&mut buf, cell.foreground);
                push_tile(&mut buf, cell.background);
            }
        }
        buf.extend_from_slice(&self.player.x.to_le_bytes());
        buf.extend_from_slice(&self.player.y.to_le_bytes());
        buf.extend_from_slice(&self.coins.to_le_bytes());
        buf.extend_from_slice(&self.keys.to_le_bytes());
        buf.push(u8::from(self.won));
        xxh3_64(&buf)
    }
}

/// How frontier nodes are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SearchStrategy {
    /// Priority is the heuristic alone. Fast, not guaranteed optimal.
    #[default]
    Greedy,
    /// Priority is moves so far plus the heuristic.
    AStar,
}

#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Maximum number of nodes popped before giving up.
    pub expansion_budget: usize,
    pub strategy: SearchStrategy,
    /// Add walk-to-key and walk-to-coin successors.
    pub macro_moves: bool,
    /// Drop successors that fail the dead-end check.
    pub prune_dead_ends: bool,
    /// The cancel flag is polled every this many expansions.
    pub cancel_check_interval: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            expansion_budget: DEFAULT_EXPANSION_BUDGET,
            strategy: SearchStrategy::Greedy,
            macro_moves: true,
            prune_dead_ends: true,
            cancel_check_interval: 1024,
        }
    }
}

/// Counters collected during one search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub expanded: usize,
    pub generated: usize,
    pub duplicates: usize,
    pub pruned: usize,
    pub macro_moves: usize,
    pub peak_frontier: usize,
    pub budget_exhausted: bool,
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl fmt::Display for SolverStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded {} | generated {} | duplicates {} | pruned {} | macro moves {} | peak frontier {} | {:.2?}",
            self.expanded,
            self.generated,
            self.duplicates,
            self.pruned,
            self.macro_moves,
            self.peak_frontier,
            self.elapsed
        )?;
        if self.budget_exhausted {
            write!(f, " | budget exhausted")?;
        }
        if self.cancelled {
            write!(f, " | cancelled")?;
        }
        Ok(())
    }
}

/// Result of `solve_with_config`.
#[derive(Clone, Debug)]
pub struct SolveOutcome {
    /// Winning moves, or `None` if none was found within the budget.
    pub path: Option<Vec<Direction>>,
    pub stats: SolverStats,
}

struct Node {
    state: SearchState,
    parent: Option<usize>,
    // Moves from the parent; one direction for a step, several for a macro move.
    edge: Vec<Direction>,
    depth: usize,
}

/// Searches for a move sequence that wins `game`, using the default
/// configuration with the given expansion budget.
///
/// `None` means nothing was found within the budget; it does not prove the
/// level unsolvable.
///
/// # Examples
/// ```
/// use cratepush_solver::board::Direction;
/// use cratepush_solver::heuristics::basic;
/// use cratepush_solver::solver::solve;
/// use cratepush_solver::utils::game_from_str_array;
///
/// let game = game_from_str_array(&["PF"]).unwrap();
/// assert_eq!(solve(&game, basic, 1000), Some(vec![Direction::Right]));
/// ```
pub fn solve<H>(game: &Game, heuristic: H, expansion_budget: usize) -> Option<Vec<Direction>>
where
    H: Fn(&SearchState) -> u64,
{
    let config = SolverConfig {
        expansion_budget,
        ..SolverConfig::default()
    };
    solve_with_config(game, heuristic, &config, None).path
}

/// Full-control entry point: custom configuration, optional cooperative
/// cancellation, and search statistics.
pub fn solve_with_config<H>(
    game: &Game,
    heuristic: H,
    config: &SolverConfig,
    cancel: Option<&AtomicBool>,
) -> SolveOutcome
where
    H: Fn(&SearchState) -> u64,
{
    let started_at = Instant::now();
    let mut stats = SolverStats::default();
    let priority = |h: u64, depth: usize| match config.strategy {
        SearchStrategy::Greedy => h,
        SearchStrategy::AStar => h.saturating_add(depth as u64),
    };

    let root = SearchState::from(game);
    let mut visited = HashSet::new();
    visited.insert(root.fingerprint());
    let mut frontier = BinaryHeap::new();
    frontier.push(Reverse((priority(heuristic(&root), 0), 0usize)));
    let mut arena = vec![Node {
        state: root,
        parent: None,
        edge: Vec::new(),
        depth: 0,
    }];

    let check_interval = config.cancel_check_interval.max(1);
    let mut path = None;
    while let Some(Reverse((_, index))) = frontier.pop() {
        if stats.expanded >= config.expansion_budget {
            stats.budget_exhausted = true;
            break;
        }
        if stats.expanded % check_interval == 0
            && cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            stats.cancelled = true;
            break;
        }
        stats.expanded += 1;

        if arena[index].state.won {
            path = Some(reconstruct_path(&arena, index));
            break;
        }

        let depth = arena[index].depth;
        for (edge, child) in successors(&arena[index].state, config, &mut stats) {
            stats.generated += 1;
            if !visited.insert(child.fingerprint()) {
                stats.duplicates += 1;
                continue;
            }
            if config.prune_dead_ends && !child.won && is_dead_end(&child) {
                stats.pruned += 1;
                continue;
            }
            let child_depth = depth + edge.len();
            let key = priority(heuristic(&child), child_depth);
            frontier.push(Reverse((key, arena.len())));
            arena.push(Node {
                state: child,
                parent: Some(index),
                edge,
                depth: child_depth,
            });
        }
        stats.peak_frontier = stats.peak_frontier.max(frontier.len());
    }

    stats.elapsed = started_at.elapsed();
    SolveOutcome { path, stats }
}

fn successors(
    state: &SearchState,
    config: &SolverConfig,
    stats: &mut SolverStats,
) -> Vec<(Vec<Direction>, SearchState)> {
    let game = state.to_game();
    let mut out = Vec::new();
    for direction in Direction::ALL {
        let (next, changed) = do_game_move(&game, direction);
        if changed {
            out.push((vec![direction], SearchState::from(&next)));
        }
    }

    if config.macro_moves {
        let reach = reachable_positions(&game, PathOptions::permissive());
        let targets = state
            .board
            .find_all(|c| matches!(c.foreground, Tile::Key | Tile::Coin));
        for target in targets {
            let Some(walk) = reach.path_to(target) else {
                continue;
            };
            // Single steps are already covered above.
            if walk.len() < 2 {
                continue;
            }
            if let Some(next) = replay(&game, &walk) {
                stats.macro_moves += 1;
                out.push((walk, SearchState::from(&next)));
            }
        }
    }
    out
}

// Plays `moves` through the engine; `None` if any of them is rejected.
fn replay(game: &Game, moves: &[Direction]) -> Option<Game> {
    moves.iter().try_fold(game.clone(), |current, &direction| {
        let (next, changed) = do_game_move(&current, direction);
        changed.then_some(next)
    })
}

fn reconstruct_path(arena: &[Node], mut index: usize) -> Vec<Direction> {
    let mut edges = Vec::new();
    while let Some(parent) = arena[index].parent {
        edges.push(&arena[index].edge);
        index = parent;
    }
    edges.into_iter().rev().flatten().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::{basic, compound};
    use crate::utils::game_from_str_array;

    fn play(game: &Game, moves: &[Direction]) -> Game {
        replay(game, moves).expect("solution replays through the engine")
    }

    #[test]
    fn test_trivial_solution() {
        let game = game_from_str_array(&["PF"]).unwrap();
        assert_eq!(game.max_coins(), 0);
        assert_eq!(solve(&game, basic, 100), Some(vec![Direction::Right]));
        assert_eq!(solve(&game, compound, 100), Some(vec![Direction::Right]));
    }

    #[test]
    fn test_already_won_returns_empty_path() {
        let game = game_from_str_array(&["PF"]).unwrap();
        let (won, _) = do_game_move(&game, Direction::Right);
        assert_eq!(solve(&won, basic, 10), Some(Vec::new()));
    }

    #[test]
    fn test_enclosed_flag_has_no_solution() {
        let game = game_from_str_array(&["P.###", "..#F#", "..###"]).unwrap();
        let outcome = solve_with_config(&game, basic, &SolverConfig::default(), None);
        assert_eq!(outcome.path, None);
        assert!(outcome.stats.pruned > 0);
        assert!(!outcome.stats.budget_exhausted);

        let unpruned = SolverConfig {
            prune_dead_ends: false,
            expansion_budget: 50,
            ..SolverConfig::default()
        };
        let outcome = solve_with_config(&game, basic, &unpruned, None);
        assert_eq!(outcome.path, None);
        assert_eq!(outcome.stats.pruned, 0);
    }

    #[test]
    fn test_collects_coins_before_flag() {
        let game = game_from_str_array(&["F.P.$"]).unwrap();
        for heuristic in [basic as fn(&SearchState) -> u64, compound] {
            let path = solve(&game, heuristic, 1000).unwrap();
            let end = play(&game, &path);
            assert!(end.won());
            assert_eq!(end.coins(), 1);
        }
    }

    #[test]
    fn test_push_and_fill_puzzle() {
        let game = game_from_str_array(&[
            "#######",
            "#P.C.O#",
            "#.....#",
            "#..$.F#",
            "#######",
        ])
        .unwrap();
        let path = solve(&game, compound, 10_000).unwrap();
        assert!(play(&game, &path).won());
    }

    #[test]
    fn test_key_and_door_puzzle() {
        let game = game_from_str_array(&[
            "#######",
            "#P..#F#",
            "#k..D.#",
            "#######",
        ])
        .unwrap();
        let path = solve(&game, compound, 10_000).unwrap();
        let end = play(&game, &path);
        assert!(end.won());
        assert_eq!(end.keys(), 0);
    }

    #[test]
    fn test_astar_finds_shortest_walk() {
        let game = game_from_str_array(&["P....", ".###.", "....F"]).unwrap();
        let config = SolverConfig {
            strategy: SearchStrategy::AStar,
            macro_moves: false,
            ..SolverConfig::default()
        };
        let outcome = solve_with_config(&game, basic, &config, None);
        let path = outcome.path.unwrap();
        assert_eq!(path.len(), 6);
        assert!(play(&game, &path).won());
    }

    #[test]
    fn test_budget_exhaustion() {
        let game = game_from_str_array(&["P........F"]).unwrap();
        let config = SolverConfig {
            expansion_budget: 1,
            ..SolverConfig::default()
        };
        let outcome = solve_with_config(&game, basic, &config, None);
        assert_eq!(outcome.path, None);
        assert!(outcome.stats.budget_exhausted);
        assert_eq!(outcome.stats.expanded, 1);
    }

    #[test]
    fn test_cancellation() {
        let game = game_from_str_array(&["P........F"]).unwrap();
        let cancel = AtomicBool::new(true);
        let config = SolverConfig {
            cancel_check_interval: 1,
            ..SolverConfig::default()
        };
        let outcome = solve_with_config(&game, basic, &config, Some(&cancel));
        assert_eq!(outcome.path, None);
        assert!(outcome.stats.cancelled);
        assert_eq!(outcome.stats.expanded, 0);
    }

    #[test]
    fn test_macro_moves_are_generated() {
        let game = game_from_str_array(&["P...$", ".....", "k...F"]).unwrap();
        let outcome = solve_with_config(&game, compound, &SolverConfig::default(), None);
        assert!(outcome.stats.macro_moves > 0);
        let path = outcome.path.unwrap();
        assert!(play(&game, &path).won());
    }

    #[test]
    fn test_sample_levels_are_solvable() {
        use crate::engine::initialize_game;
        use crate::level::{Level, LevelFormat};

        let samples = [
            ("first_steps", include_str!("../levels/first_steps.txt")),
            ("keys_and_doors", include_str!("../levels/keys_and_doors.txt")),
            ("ice", include_str!("../levels/ice.txt")),
            ("gates", include_str!("../levels/gates.json")),
            ("fuse", include_str!("../levels/fuse.lvl")),
        ];
        for (name, text) in samples {
            let level = Level::parse(name, text, LevelFormat::detect(text)).unwrap();
            let game = initialize_game(&level);
            let path = solve(&game, compound, DEFAULT_EXPANSION_BUDGET)
                .unwrap_or_else(|| panic!("{name} not solved"));
            assert!(play(&game, &path).won(), "{name}");
        }
    }

    #[test]
    fn test_fingerprint_ignores_transients() {
        let game = game_from_str_array(&["P.$", "..."]).unwrap();
        let (right, _) = do_game_move(&game, Direction::Right);
        let (down, _) = do_game_move(&game, Direction::Down);
        let (down_right, _) = do_game_move(&down, Direction::Right);
        let (back_up, _) = do_game_move(&down_right, Direction::Up);
        assert_ne!(right.move_history(), back_up.move_history());
        assert_eq!(
            SearchState::from(&right).fingerprint(),
            SearchState::from(&back_up).fingerprint()
        );
        assert_ne!(
            SearchState::from(&right).fingerprint(),
            SearchState::from(&down).fingerprint()
        );
    }

    #[test]
    fn test_search_state_round_trips_to_game() {
        let game = game_from_str_array(&["P$k", "D.F"]).unwrap();
        let (game, _) = do_game_move(&game, Direction::Right);
        let state = SearchState::from(&game);
        let rebuilt = state.to_game();
        assert_eq!(rebuilt.coins(), 1);
        assert_eq!(rebuilt.player(), game.player());
        assert!(rebuilt.move_history().is_empty());
        assert_eq!(rebuilt.sound(), None);
        assert_eq!(SearchState::from(&rebuilt), state);
    }
}
