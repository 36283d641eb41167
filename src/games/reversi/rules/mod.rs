//! Game rules for Reversi.
//!
//! Pure functions over a [`Board`]: no I/O and no state beyond the board
//! they are given. Rules are kept apart from board storage so the turn
//! resolver and both controllers share one source of truth.

pub mod capture;
pub mod terminal;

pub use capture::{apply_move, captures, is_legal, legal_moves};
pub use terminal::{count_stones, is_terminal, outcome};

use super::{Board, Color, MoveError, Outcome, Position, StoneCount};

impl Board {
    /// Stones captured by `color` playing at `pos`. See [`captures`].
    pub fn captures(&self, pos: Position, color: Color) -> Vec<Position> {
        captures(self, pos, color)
    }

    /// Whether `color` may play at `pos`.
    pub fn is_legal(&self, pos: Position, color: Color) -> bool {
        is_legal(self, pos, color)
    }

    /// All legal moves for `color`, row-major.
    pub fn legal_moves(&self, color: Color) -> Vec<Position> {
        legal_moves(self, color)
    }

    /// Plays a stone, returning the resulting board. See [`apply_move`].
    pub fn apply_move(&self, pos: Position, color: Color) -> Result<Board, MoveError> {
        apply_move(self, pos, color)
    }

    /// Stone totals.
    pub fn count(&self) -> StoneCount {
        count_stones(self)
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> u8 {
        count_stones(self).empty()
    }

    /// Whether neither color can move.
    pub fn is_terminal(&self) -> bool {
        is_terminal(self)
    }

    /// Winner by stone comparison (meaningful once terminal).
    pub fn outcome(&self) -> Outcome {
        outcome(self)
    }
}
