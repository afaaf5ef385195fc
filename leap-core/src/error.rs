//! Error types for the Leap engine boundaries.
//!
//! The rules themselves never fail: illegal moves are answered with `false`
//! or an empty list. These errors cover input that arrives from outside the
//! engine (coordinates, notation, strategy names) and session-level requests
//! that cannot be honoured.

use thiserror::Error;

use crate::{Move, Piece};

/// Errors raised at the edges of the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LeapError {
    /// Coordinate outside the 8x8 board
    #[error("Position ({row}, {col}) is off the board")]
    OutOfBounds { row: i32, col: i32 },

    /// Move rejected by the rules engine
    #[error("Illegal move: {mov}")]
    IllegalMove { mov: Move },

    /// The requested side is not the one to move
    #[error("It is not {piece:?}'s turn")]
    NotYourTurn { piece: Piece },

    /// The game already has a winner
    #[error("Game is already over: {winner:?} won")]
    GameOver { winner: Piece },

    /// Strategy name not recognised
    #[error("Unknown strategy `{name}` (expected longest, mirror or random)")]
    UnknownStrategy { name: String },

    /// Move or position notation could not be parsed
    #[error("Invalid notation `{text}`: {reason}")]
    Notation { text: String, reason: &'static str },
}

/// Result type alias for engine boundary operations
pub type LeapResult<T> = Result<T, LeapError>;
