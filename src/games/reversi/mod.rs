//! Reversi: an 8x8 strip-capture game for two colors.

mod action;
mod position;
pub mod rules;
mod turn;
mod types;

pub use action::{Move, MoveError};
pub use position::{BOARD_SIZE, ParsePositionError, Position};
pub use turn::{GameState, Phase, advance};
pub use types::{Board, Cell, Color, Outcome, ParseBoardError, StoneCount};
