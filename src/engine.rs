//! Core move resolution for the crate-pushing puzzle.
//!
//! This module defines:
//! - `Game`: the complete state of one level attempt (board, player, counters,
//!   win flag, last sound event and the move history).
//! - `initialize_game`: builds the starting `Game` from a validated `Level`.
//! - `do_game_move`: the single-step transition. It never mutates its input;
//!   every accepted move yields a brand-new `Game`, and a rejected move hands
//!   back an identical copy of the input.
//! - `Session`: an undo/restart stack of `Game` values for interactive play.
use crate::board::{unsqueeze, Direction, LayeredBoard, Position, Tile};
use crate::level::Level;
use serde::Serialize;
use std::fmt;

/// Audio cue produced by the most recent move. The host decides what to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SoundEvent {
    Move,
    Push,
    Fill,
    Collect,
    Door,
    Explosion,
}

/// The state of a level attempt.
///
/// `max_coins` is fixed at initialization and `coins` only ever grows.
/// `won` becomes true once the player stands on a flag holding every coin.
///
/// # Examples
/// ```
/// use cratepush_solver::board::Direction;
/// use cratepush_solver::engine::{do_game_move, SoundEvent};
/// use cratepush_solver::utils::game_from_str_array;
///
/// let game = game_from_str_array(&["P$F"]).unwrap();
/// let (game, changed) = do_game_move(&game, Direction::Right);
/// assert!(changed);
/// assert_eq!(game.coins(), 1);
/// assert_eq!(game.sound(), Some(SoundEvent::Collect));
///
/// let (game, changed) = do_game_move(&game, Direction::Right);
/// assert!(changed);
/// assert!(game.won());
/// assert_eq!(game.move_history(), &[Direction::Right, Direction::Right]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Game {
    board: LayeredBoard,
    player: Position,
    coins: u32,
    max_coins: u32,
    keys: u32,
    won: bool,
    sound: Option<SoundEvent>,
    move_history: Vec<Direction>,
}

/// Builds the starting state for `level`.
///
/// The flat board is unsqueezed into layers, the spawn cell is cleared and
/// becomes the player position, and `max_coins` is set to the number of
/// coins on the board.
pub fn initialize_game(level: &Level) -> Game {
    let mut board = unsqueeze(level.board());
    let player = level.spawn();
    board.set_tile(player, Tile::Empty);
    let max_coins = board.count_foreground(|t| t == Tile::Coin) as u32;
    Game {
        board,
        player,
        coins: 0,
        max_coins,
        keys: 0,
        won: false,
        sound: None,
        move_history: Vec::new(),
    }
}

/// Attempts to move the player one cell in `direction`.
///
/// Resolution order:
/// 1. Explosions from the previous turn are cleared.
/// 2. A coin or key at the target is collected; a door is opened if a key is held.
/// 3. A crate or ice block at the target is pushed, fills a crater, or slides,
///    provided the cell beyond admits it.
/// 4. The player steps onto the target if it is now walkable.
/// 5. Every bomb's fuse ticks down; spent bombs detonate.
/// 6. The win flag and the sound event are updated and the move is recorded.
///
/// The move is all-or-nothing: if the step in (4) is not possible, every side
/// effect of (1)-(3) is discarded.
///
/// # Returns
/// `(next, true)` for an accepted move, or `(game.clone(), false)` when the
/// target is off the board or not walkable.
pub fn do_game_move(game: &Game, direction: Direction) -> (Game, bool) {
    let move_to = game.player.step(direction);
    if !game.board.in_bounds(move_to) {
        return (game.clone(), false);
    }
    let one_further = move_to.step(direction);

    let mut next = game.clone();
    next.sound = None;
    next.clear_explosions();
    next.collect_at(move_to);
    if next.board.background(one_further).can_enter(direction) {
        next.push_from(move_to, one_further, direction);
    }

    if !next.is_walkable(move_to, direction) {
        return (game.clone(), false);
    }
    next.player = move_to;
    next.tick_bombs();

    next.won = next.board.tile(move_to) == Tile::Flag && next.coins == next.max_coins;
    next.move_history.push(direction);
    if next.sound.is_none() && !next.won {
        next.sound = Some(SoundEvent::Move);
    }
    (next, true)
}

impl Game {
    /// Same as `initialize_game(level)`.
    pub fn new(level: &Level) -> Self {
        initialize_game(level)
    }

    // Rebuilds a game from the fields the solver keeps; transient fields start empty.
    pub(crate) fn from_parts(
        board: LayeredBoard,
        player: Position,
        coins: u32,
        max_coins: u32,
        keys: u32,
        won: bool,
    ) -> Self {
        Game {
            board,
            player,
            coins,
            max_coins,
            keys,
            won,
            sound: None,
            move_history: Vec::new(),
        }
    }

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

    /// Sound produced by the move that created this state.
    pub fn sound(&self) -> Option<SoundEvent> {
        self.sound
    }

    pub fn move_history(&self) -> &[Direction] {
        &self.move_history
    }

    /// Whether the player may stand on `pos` after travelling in `direction`.
    ///
    /// Walkable foregrounds are empty floor, the spawn marker and explosions;
    /// a flag only counts once every coin is collected. The background must
    /// be empty floor or a one-way gate that admits `direction`.
    pub fn is_walkable(&self, pos: Position, direction: Direction) -> bool {
        let foreground_ok = match self.board.tile(pos) {
            Tile::Empty | Tile::Spawn | Tile::Explosion | Tile::LittleExplosion => true,
            Tile::Flag => self.coins == self.max_coins,
            _ => false,
        };
        foreground_ok && self.board.background(pos).can_enter(direction)
    }

    fn clear_explosions(&mut self) {
        let spent = self
            .board
            .find_all(|c| matches!(c.foreground, Tile::Explosion | Tile::LittleExplosion));
        for pos in spent {
            self.board.set_tile(pos, Tile::Empty);
        }
    }

    fn collect_at(&mut self, pos: Position) {
        match self.board.tile(pos) {
            Tile::Coin => {
                self.coins += 1;
                self.board.set_tile(pos, Tile::Empty);
                self.sound = Some(SoundEvent::Collect);
            }
            Tile::Key => {
                self.keys += 1;
                self.board.set_tile(pos, Tile::Empty);
                self.sound = Some(SoundEvent::Collect);
            }
            // Doors are single-use and consume the key.
            Tile::Door if self.keys > 0 => {
                self.keys -= 1;
                self.board.set_tile(pos, Tile::Empty);
                self.sound = Some(SoundEvent::Door);
            }
            _ => {}
        }
    }

    // Caller has checked that the background at `one_further` admits `direction`.
    fn push_from(&mut self, move_to: Position, one_further: Position, direction: Direction) {
        let pushed = self.board.tile(move_to);
        let ahead = self.board.tile(one_further);
        if pushed.fills_craters() && ahead == Tile::Crater {
            self.board.set_tile(move_to, Tile::Empty);
            self.board.set_tile(one_further, Tile::Empty);
            self.sound = Some(SoundEvent::Fill);
        } else if pushed.is_pushable() && ahead == Tile::Empty {
            self.board.set_tile(one_further, pushed);
            self.board.set_tile(move_to, Tile::Empty);
            self.sound = Some(SoundEvent::Push);
        } else if pushed == Tile::IceBlock && ahead == Tile::Empty {
            self.slide_ice(move_to, one_further, direction);
        }
    }

    /// Slides an ice block from `origin`, starting on the empty cell `start`,
    /// until it either drops into a crater or hits something.
    ///
    /// # Panics
    /// Panics if the slide outlasts the board, which only a board without an
    /// edge could cause.
    fn slide_ice(&mut self, origin: Position, start: Position, direction: Direction) {
        self.board.set_tile(origin, Tile::Empty);
        let limit = self.board.width() + self.board.height();
        let mut resting = start;
        let mut steps = 0;
        loop {
            assert!(steps <= limit, "ice slide from {origin} never reached an edge");
            steps += 1;

            let next = resting.step(direction);
            let enterable = self.board.background(next).can_enter(direction);
            match self.board.tile(next) {
                Tile::Crater if enterable => {
                    self.board.set_tile(next, Tile::Empty);
                    self.sound = Some(SoundEvent::Fill);
                    return;
                }
                Tile::Empty if enterable => resting = next,
                _ => {
                    self.board.set_tile(resting, Tile::IceBlock);
                    self.sound = Some(SoundEvent::Push);
                    return;
                }
            }
        }
    }

    fn tick_bombs(&mut self) {
        let bombs = self
            .board
            .find_all(|c| matches!(c.foreground, Tile::Bomb { .. }));
        let mut detonated = Vec::new();
        for pos in bombs {
            if let Tile::Bomb { fuse } = self.board.tile(pos) {
                let fuse = fuse.saturating_sub(1);
                if fuse == 0 {
                    detonated.push(pos);
                } else {
                    self.board.set_tile(pos, Tile::Bomb { fuse });
                }
            }
        }

        for pos in detonated {
            self.board.set_tile(pos, Tile::Explosion);
            for d in Direction::ALL {
                let neighbor = pos.step(d);
                if self.board.tile(neighbor).is_explodable() {
                    self.board.set_tile(neighbor, Tile::LittleExplosion);
                }
            }
            self.sound = Some(SoundEvent::Explosion);
        }
    }
}

impl fmt::Display for Game {
    /// Draws the board with the player as `@`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.board.rows().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for (c, cell) in row.iter().enumerate() {
                if Position::new(c as i32, r as i32) == self.player {
                    write!(f, "@")?;
                } else {
                    write!(f, "{}", cell.to_flat().to_char())?;
                }
            }
        }
        Ok(())
    }
}

/// Undo/restart history over `Game` values.
///
/// Because moves never mutate a `Game`, undo is simply popping the stack.
#[derive(Clone, Debug)]
pub struct Session {
    history: Vec<Game>,
}

impl Session {
    pub fn new(level: &Level) -> Self {
        Session::from_game(initialize_game(level))
    }

    pub fn from_game(game: Game) -> Self {
        Session {
            history: vec![game],
        }
    }

    pub fn current(&self) -> &Game {
        // The stack always holds the initial state.
        &self.history[self.history.len() - 1]
    }

    /// Applies one move; only accepted moves are recorded.
    pub fn apply(&mut self, direction: Direction) -> bool {
        let (next, changed) = do_game_move(self.current(), direction);
        if changed {
            self.history.push(next);
        }
        changed
    }

    /// Applies a sequence of moves, stopping at the first rejected one.
    ///
    /// # Returns
    /// The number of moves that were applied.
    pub fn apply_all(&mut self, directions: &[Direction]) -> usize {
        directions
            .iter()
            .take_while(|&&d| self.apply(d))
            .count()
    }

    /// Reverts the last accepted move. Returns `false` at the initial state.
    pub fn undo(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }

    /// Drops every move and returns to the initial state.
    pub fn restart(&mut self) {
        self.history.truncate(1);
    }

    /// Number of accepted moves on the stack.
    pub fn steps(&self) -> usize {
        self.history.len() - 1
    }
}
