//! Board coordinates.

use derive_more::{Display, Error};
use serde::Serialize;
use std::str::FromStr;
use tracing::instrument;

/// Width and height of the board.
pub const BOARD_SIZE: usize = 8;

/// A cell coordinate, `row` and `col` both in `0..8`.
///
/// Text form is algebraic: column letter then 1-based row, so `d3` is
/// row 2, column 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Creates a position, or `None` when off the board.
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Row index (0-7, top to bottom).
    pub fn row(self) -> u8 {
        self.row
    }

    /// Column index (0-7, left to right).
    pub fn col(self) -> u8 {
        self.col
    }

    /// Row-major index (0-63).
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// Creates a position from a row-major index.
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Self::new((index / BOARD_SIZE) as u8, (index % BOARD_SIZE) as u8)
        } else {
            None
        }
    }

    /// The neighbouring position one step in direction `(dr, dc)`, if on the board.
    pub fn step(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as u8, col as u8)
    }

    /// All 64 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE * BOARD_SIZE).filter_map(Self::from_index)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row + 1)
    }
}

/// Error parsing a position like `d3`.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid position '{}': expected a column a-h followed by a row 1-8", input)]
pub struct ParsePositionError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for Position {
    type Err = ParsePositionError;

    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePositionError {
            input: s.to_string(),
        };
        let lower = s.trim().to_ascii_lowercase();
        let mut chars = lower.chars();
        let (Some(col), Some(row), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(err());
        };
        if !('a'..='h').contains(&col) || !('1'..='8').contains(&row) {
            return Err(err());
        }
        Self::new(row as u8 - b'1', col as u8 - b'a').ok_or_else(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_off_board() {
        assert!(Position::new(7, 7).is_some());
        assert!(Position::new(8, 0).is_none());
        assert!(Position::new(0, 8).is_none());
    }

    #[test]
    fn test_algebraic_round_trip() {
        let pos = Position::new(2, 3).unwrap();
        assert_eq!(pos.to_string(), "d3");
        assert_eq!("d3".parse::<Position>(), Ok(pos));
        assert_eq!(" H8 ".parse::<Position>().ok(), Position::new(7, 7));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("i1".parse::<Position>().is_err());
        assert!("a9".parse::<Position>().is_err());
        assert!("a10".parse::<Position>().is_err());
        assert!("".parse::<Position>().is_err());
    }

    #[test]
    fn test_step_stops_at_edges() {
        let corner = Position::new(0, 0).unwrap();
        assert_eq!(corner.step(-1, 0), None);
        assert_eq!(corner.step(1, 1), Position::new(1, 1));
    }

    #[test]
    fn test_all_is_row_major() {
        let all: Vec<_> = Position::all().collect();
        assert_eq!(all.len(), 64);
        assert_eq!(all[0], Position::new(0, 0).unwrap());
        assert_eq!(all[9], Position::new(1, 1).unwrap());
        assert_eq!(all[63].index(), 63);
    }
}
