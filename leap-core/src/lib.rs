//! Leap: a two-player Halma-style hopping game on an 8x8 grid.
//!
//! # Board Layout
//!
//! ```text
//!   col: 0 1 2 3 4 5 6 7
//!   r0   . . . . o o o o
//!   r1   . . . . o o o o
//!   r2   . . . . o o o o
//!   r3   . . . . . . . .
//!   r4   . . . . . . . .
//!   r5   x x x x . . . .
//!   r6   x x x x . . . .
//!   r7   x x x x . . . .
//! ```
//!
//! `x` is [`Piece::Player`], `o` is [`Piece::Opponent`]. A side wins once all
//! twelve of its pieces sit in the block the other side started in.
//!
//! # Turns
//!
//! A turn moves exactly one piece. It either makes a single orthogonal step
//! (which ends the turn), or a chain of orthogonal hops, each jumping over an
//! adjacent occupied cell into the empty cell beyond. A chain ends when the
//! mover asks for it or when no further hop exists. A hop may never land on a
//! square the chain has already departed from.
//!
//! Every applied move is kept on the board's move stack. The trailing run of
//! moves made by the side to move is the *current chain*, and all of the
//! chain rules are answered from it.

mod chain;
pub mod cpu;
pub mod error;
mod notation;
mod rules;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use chain::Chain;
pub use cpu::{LongestChain, MirrorOpponent, RandomChain, Strategy, StrategyKind};
pub use error::{LeapError, LeapResult};
pub use notation::chain_notation;
pub use session::Game;

/// Width and height of the board.
pub const BOARD_SIZE: u8 = 8;
/// Rows in each home block.
pub const HOME_ROWS: u8 = 3;
/// Columns in each home block.
pub const HOME_COLS: u8 = 4;
/// Pieces each side starts with.
pub const PIECES_PER_SIDE: usize = (HOME_ROWS * HOME_COLS) as usize;

const N: usize = BOARD_SIZE as usize;

/// Contents of a cell. `None` marks an empty cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Piece {
    #[default]
    None = 0,
    Player = 1,
    Opponent = 2,
}

impl Piece {
    /// The other side. `None` has no opponent and maps to itself.
    #[inline]
    pub fn opponent(self) -> Piece {
        match self {
            Piece::None => Piece::None,
            Piece::Player => Piece::Opponent,
            Piece::Opponent => Piece::Player,
        }
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == Piece::None
    }

    /// Convert from u8 (0, 1 or 2) to Piece.
    #[inline]
    pub fn from_bits(bits: u8) -> Option<Piece> {
        match bits {
            0 => Some(Piece::None),
            1 => Some(Piece::Player),
            2 => Some(Piece::Opponent),
            _ => None,
        }
    }

    /// The block this side starts in.
    pub fn home(self) -> Option<Region> {
        match self {
            Piece::None => None,
            Piece::Player => Some(Region::PLAYER_HOME),
            Piece::Opponent => Some(Region::OPPONENT_HOME),
        }
    }

    /// The block this side must fill to win (the other side's home).
    pub fn target(self) -> Option<Region> {
        self.opponent().home()
    }

    /// Single character used by the text rendering.
    pub fn symbol(self) -> char {
        match self {
            Piece::None => '.',
            Piece::Player => 'x',
            Piece::Opponent => 'o',
        }
    }
}

/// Rectangular block of cells, rows and columns half-open.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Region {
    pub row_start: u8,
    pub row_end: u8,
    pub col_start: u8,
    pub col_end: u8,
}

impl Region {
    /// Bottom-left block.
    pub const PLAYER_HOME: Region = Region {
        row_start: BOARD_SIZE - HOME_ROWS,
        row_end: BOARD_SIZE,
        col_start: 0,
        col_end: HOME_COLS,
    };

    /// Top-right block.
    pub const OPPONENT_HOME: Region = Region {
        row_start: 0,
        row_end: HOME_ROWS,
        col_start: BOARD_SIZE - HOME_COLS,
        col_end: BOARD_SIZE,
    };

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        (self.row_start..self.row_end).contains(&pos.row)
            && (self.col_start..self.col_end).contains(&pos.col)
    }

    /// All positions in the block, row-major.
    pub fn positions(self) -> impl Iterator<Item = Pos> {
        (self.row_start..self.row_end)
            .flat_map(move |row| (self.col_start..self.col_end).map(move |col| Pos { row, col }))
    }
}

/// Board coordinate, row 0 at the top.
///
/// Deserialized coordinates go through [`Pos::new`], so off-board input is
/// rejected before it reaches a board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPos")]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

#[derive(Deserialize)]
struct RawPos {
    row: u8,
    col: u8,
}

impl TryFrom<RawPos> for Pos {
    type Error = LeapError;

    fn try_from(raw: RawPos) -> LeapResult<Pos> {
        Pos::new(raw.row, raw.col)
    }
}

impl Pos {
    /// Checked constructor for coordinates that come from outside the engine.
    pub fn new(row: u8, col: u8) -> LeapResult<Pos> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Ok(Pos { row, col })
        } else {
            Err(LeapError::OutOfBounds {
                row: row as i32,
                col: col as i32,
            })
        }
    }

    /// Unchecked constructor. Callers guarantee the coordinate is on the board.
    #[inline]
    pub fn from_row_col(row: u8, col: u8) -> Pos {
        debug_assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        Pos { row, col }
    }

    /// The position `(dr, dc)` away, or None if that falls off the board.
    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Pos> {
        let row = self.row as i16 + dr as i16;
        let col = self.col as i16 + dc as i16;
        let size = BOARD_SIZE as i16;
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(Pos {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn manhattan(self, other: Pos) -> u8 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    #[inline]
    pub fn euclidean(self, other: Pos) -> f64 {
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        dr.hypot(dc)
    }

    /// Iterate over all 64 positions, row-major.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Pos { row, col }))
    }
}

/// Orthogonal unit offsets: North, East, South, West.
const DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// A single relocation of one piece. Moves are plain values.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Move {
    pub src: Pos,
    pub dest: Pos,
    pub piece: Piece,
}

impl Move {
    #[inline]
    pub fn new(src: Pos, dest: Pos, piece: Piece) -> Move {
        Move { src, dest, piece }
    }

    /// Manhattan distance between source and destination.
    #[inline]
    pub fn distance(&self) -> u8 {
        self.src.manhattan(self.dest)
    }

    #[inline]
    pub fn is_step(&self) -> bool {
        self.distance() == 1
    }

    /// The cell jumped over, if this move has the shape of a hop
    /// (two cells along a single axis).
    pub fn midpoint(&self) -> Option<Pos> {
        let dr = self.dest.row as i8 - self.src.row as i8;
        let dc = self.dest.col as i8 - self.src.col as i8;
        match (dr, dc) {
            (0, 2) | (0, -2) | (2, 0) | (-2, 0) => self.src.offset(dr / 2, dc / 2),
            _ => None,
        }
    }

    #[inline]
    pub fn is_hop(&self) -> bool {
        self.midpoint().is_some()
    }
}

/// Mean coordinate of a set of pieces.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct Centroid {
    pub row: f64,
    pub col: f64,
}

impl Centroid {
    #[inline]
    pub fn distance(&self, other: &Centroid) -> f64 {
        (self.row - other.row).hypot(self.col - other.col)
    }
}

/// Live game state: the grid, the side to move and every move applied since
/// the last [`Board::init`].
///
/// Each cell holds exactly one [`Piece`]; a move clears its source before it
/// fills its destination, so no cell ever holds two pieces.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    cells: [[Piece; N]; N],
    turn: Piece,
    move_stack: Vec<Move>,
}

impl Board {
    /// Create a board in the starting layout with the Player to move.
    pub fn new() -> Board {
        let mut board = Board::empty();
        board.init();
        board
    }

    /// Create a board with no pieces, Player to move. Used to set up
    /// positions by hand with [`Board::set_piece`].
    pub fn empty() -> Board {
        Board {
            cells: [[Piece::None; N]; N],
            turn: Piece::Player,
            move_stack: Vec::new(),
        }
    }

    /// Reset to the starting layout: clear every cell, fill both home blocks,
    /// empty the move stack and give the Player the move.
    pub fn init(&mut self) {
        self.cells = [[Piece::None; N]; N];
        for pos in Region::PLAYER_HOME.positions() {
            self.set_piece(pos, Piece::Player);
        }
        for pos in Region::OPPONENT_HOME.positions() {
            self.set_piece(pos, Piece::Opponent);
        }
        self.move_stack.clear();
        self.turn = Piece::Player;
    }

    #[inline]
    pub fn size(&self) -> u8 {
        BOARD_SIZE
    }

    #[inline]
    pub fn piece_at(&self, pos: Pos) -> Piece {
        self.cells[pos.row as usize][pos.col as usize]
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.piece_at(pos).is_none()
    }

    /// Overwrite a cell. Does NOT touch the move stack or the turn.
    #[inline]
    pub fn set_piece(&mut self, pos: Pos, piece: Piece) {
        self.cells[pos.row as usize][pos.col as usize] = piece;
    }

    /// The side to move. Never `Piece::None`.
    #[inline]
    pub fn turn(&self) -> Piece {
        self.turn
    }

    /// Hand the move to `piece`. For setting up positions; play changes the
    /// turn through [`Board::try_end_turn`] only.
    pub fn set_turn(&mut self, piece: Piece) {
        debug_assert!(!piece.is_none());
        self.turn = piece;
    }

    /// Every move applied since the last reset, oldest first.
    #[inline]
    pub fn move_stack(&self) -> &[Move] {
        &self.move_stack
    }

    #[inline]
    pub fn last_move(&self) -> Option<&Move> {
        self.move_stack.last()
    }

    pub(crate) fn push_move(&mut self, mov: Move) {
        self.move_stack.push(mov);
    }

    pub(crate) fn flip_turn(&mut self) {
        self.turn = self.turn.opponent();
    }

    /// The trailing run of moves made by the side to move, oldest first.
    pub fn current_chain(&self) -> &[Move] {
        let run = self
            .move_stack
            .iter()
            .rev()
            .take_while(|mov| mov.piece == self.turn)
            .count();
        &self.move_stack[self.move_stack.len() - run..]
    }

    /// All positions holding `piece`, row-major.
    pub fn positions_of(&self, piece: Piece) -> Vec<Pos> {
        Pos::all().filter(|&pos| self.piece_at(pos) == piece).collect()
    }

    /// On-board positions one cell away orthogonally (N, E, S, W).
    pub fn neighbours(&self, pos: Pos) -> Vec<Pos> {
        DIRECTIONS
            .iter()
            .filter_map(|&(dr, dc)| pos.offset(dr, dc))
            .collect()
    }

    /// On-board positions two cells away orthogonally: hop landing squares.
    pub fn extended_neighbours(&self, pos: Pos) -> Vec<Pos> {
        DIRECTIONS
            .iter()
            .filter_map(|&(dr, dc)| pos.offset(dr * 2, dc * 2))
            .collect()
    }

    /// Unvalidated step and hop candidates from `src`.
    pub fn candidate_moves(&self, src: Pos, piece: Piece) -> Vec<Move> {
        self.neighbours(src)
            .into_iter()
            .chain(self.extended_neighbours(src))
            .map(|dest| Move::new(src, dest, piece))
            .collect()
    }

    /// Mean position of the pieces of one side, or None if it has none.
    pub fn average_position(&self, piece: Piece) -> Option<Centroid> {
        let positions = self.positions_of(piece);
        if positions.is_empty() {
            return None;
        }
        let count = positions.len() as f64;
        let (rows, cols) = positions.iter().fold((0.0, 0.0), |(r, c), pos| {
            (r + pos.row as f64, c + pos.col as f64)
        });
        Some(Centroid {
            row: rows / count,
            col: cols / count,
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: Vec<String> = row.iter().map(|piece| piece.symbol().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
