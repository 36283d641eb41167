//! First-class action types for Reversi.
//!
//! A move always names the color placing the stone. Replaying a move that
//! arrived from the move log must not depend on whose turn the local side
//! believes it is.

use super::{Color, Position};
use serde::Serialize;
use tracing::instrument;

/// A stone placement by an explicit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    /// Where the stone goes.
    pub position: Position,
    /// Color of the placed stone.
    pub color: Color,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(position: Position, color: Color) -> Self {
        Self { position, color }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.color, self.position)
    }
}

/// Why a move was not applied.
///
/// Rejections never change state; callers keep what they had.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The target cell already holds a stone.
    #[display("Square {} is already occupied", _0)]
    Occupied(Position),

    /// The placement would not capture anything.
    #[display("{} at {} captures no stones", color, position)]
    NoCapture {
        /// Target cell.
        position: Position,
        /// Color attempting the move.
        color: Color,
    },

    /// The game has already ended.
    #[display("Game is already over")]
    GameOver,

    /// Remote play: the local side does not hold the turn.
    #[display("It's not {}'s turn", _0)]
    NotYourTurn(Color),

    /// No game has been started.
    #[display("No game in progress")]
    NoGame,
}

impl std::error::Error for MoveError {}
