//! Text notation for positions and moves.
//!
//! A position is written `(row,col)`, a move `(row,col)->(row,col)`. The
//! arrow may also be written `→`. Moves do not record their piece; it is
//! supplied by whoever parses them.

use std::fmt;
use std::str::FromStr;

use crate::{LeapError, LeapResult, Move, Piece, Pos};

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.src, self.dest)
    }
}

fn notation_error(text: &str, reason: &'static str) -> LeapError {
    LeapError::Notation {
        text: text.to_string(),
        reason,
    }
}

impl FromStr for Pos {
    type Err = LeapError;

    fn from_str(s: &str) -> LeapResult<Pos> {
        let text = s.trim();
        let inner = text
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| notation_error(text, "expected (row,col)"))?;

        let mut parts = inner.split(',');
        let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(notation_error(text, "expected row,col"));
        };
        let row: u8 = row
            .trim()
            .parse()
            .map_err(|_| notation_error(text, "invalid row"))?;
        let col: u8 = col
            .trim()
            .parse()
            .map_err(|_| notation_error(text, "invalid col"))?;

        Pos::new(row, col)
    }
}

impl Move {
    /// Parse `(r,c)->(r,c)` into a move of `piece`.
    pub fn from_notation(text: &str, piece: Piece) -> LeapResult<Move> {
        let text = text.trim();
        let (src, dest) = text
            .split_once("->")
            .or_else(|| text.split_once('→'))
            .ok_or_else(|| notation_error(text, "expected arrow"))?;
        Ok(Move::new(src.parse()?, dest.parse()?, piece))
    }
}

/// Join a chain of moves as `(r,c)->(r,c) (r,c)->(r,c) ...`.
pub fn chain_notation(moves: &[Move]) -> String {
    moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
