//! Core domain types for Reversi.

use super::position::{BOARD_SIZE, Position};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Stone color. Black moves first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    /// Black (moves first, initiator in remote play).
    Black,
    /// White (joiner in remote play).
    White,
}

impl Color {
    /// Returns the opposing color.
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Single-character symbol used in board diagrams.
    pub fn symbol(self) -> char {
        match self {
            Color::Black => '●',
            Color::White => '○',
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// No stone.
    Empty,
    /// A stone of the given color.
    Stone(Color),
}

impl Cell {
    /// Returns the stone color, if any.
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Stone(color) => Some(color),
        }
    }
}

/// 8x8 Reversi board.
///
/// A plain value: copies never alias, so every move produces a new board and
/// leaves the old one intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Board {
    /// Cells indexed `[row][col]`.
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates a board with no stones.
    pub fn empty() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Creates the standard starting position:
    /// d4 = white, e4 = black, d5 = black, e5 = white.
    #[instrument]
    pub fn initial() -> Self {
        let mut board = Self::empty();
        board.cells[3][3] = Cell::Stone(Color::White);
        board.cells[3][4] = Cell::Stone(Color::Black);
        board.cells[4][3] = Cell::Stone(Color::Black);
        board.cells[4][4] = Cell::Stone(Color::White);
        board
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.row() as usize][pos.col() as usize]
    }

    /// Sets the cell at the given position.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.row() as usize][pos.col() as usize] = cell;
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// Returns all rows.
    pub fn rows(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "   a b c d e f g h")?;
        writeln!(f, "  ┌─┬─┬─┬─┬─┬─┬─┬─┐")?;
        for (row, cells) in self.cells.iter().enumerate() {
            write!(f, "{} │", row + 1)?;
            for cell in cells {
                let symbol = cell.color().map(Color::symbol).unwrap_or(' ');
                write!(f, "{}│", symbol)?;
            }
            writeln!(f)?;
            if row + 1 < BOARD_SIZE {
                writeln!(f, "  ├─┼─┼─┼─┼─┼─┼─┼─┤")?;
            }
        }
        write!(f, "  └─┴─┴─┴─┴─┴─┴─┴─┘")
    }
}

/// Error parsing a board diagram.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid board diagram: {}", message)]
pub struct ParseBoardError {
    /// What was wrong with the diagram.
    pub message: String,
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses an 8-row diagram of `B`, `W` and `.` (whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells: Vec<Cell> = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                'B' | 'b' | '●' => Ok(Cell::Stone(Color::Black)),
                'W' | 'w' | '○' => Ok(Cell::Stone(Color::White)),
                '.' | '-' => Ok(Cell::Empty),
                other => Err(ParseBoardError {
                    message: format!("unexpected character '{}'", other),
                }),
            })
            .collect::<Result<_, _>>()?;

        if cells.len() != BOARD_SIZE * BOARD_SIZE {
            return Err(ParseBoardError {
                message: format!("expected 64 cells, found {}", cells.len()),
            });
        }

        let mut board = Board::empty();
        for (pos, cell) in Position::all().zip(cells) {
            board.set(pos, cell);
        }
        Ok(board)
    }
}

/// Stone totals for both colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StoneCount {
    /// Black stones on the board.
    pub black: u8,
    /// White stones on the board.
    pub white: u8,
}

impl StoneCount {
    /// Number of empty cells implied by the totals.
    pub fn empty(&self) -> u8 {
        ((BOARD_SIZE * BOARD_SIZE) as u8)
            .saturating_sub(self.black)
            .saturating_sub(self.white)
    }

    /// Stones of one color.
    pub fn of(&self, color: Color) -> u8 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }
}

/// Result of a game, by stone comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// One color has more stones.
    Winner(Color),
    /// Equal stone counts.
    Draw,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(color) => write!(f, "{} wins", color),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}
