//! Counting, terminal detection and winner determination.

use super::super::{Board, Cell, Color, Outcome, StoneCount};
use super::capture::legal_moves;
use tracing::instrument;

/// Counts stones of each color.
pub fn count_stones(board: &Board) -> StoneCount {
    board
        .rows()
        .iter()
        .flatten()
        .fold(StoneCount::default(), |mut count, cell| {
            match cell {
                Cell::Stone(Color::Black) => count.black += 1,
                Cell::Stone(Color::White) => count.white += 1,
                Cell::Empty => {}
            }
            count
        })
}

/// The game is over when neither color has a legal move.
#[instrument(skip(board))]
pub fn is_terminal(board: &Board) -> bool {
    legal_moves(board, Color::Black).is_empty() && legal_moves(board, Color::White).is_empty()
}

/// Winner by stone count; equal counts are a draw.
///
/// Only meaningful on a terminal board, but computable at any time.
pub fn outcome(board: &Board) -> Outcome {
    let count = count_stones(board);
    match count.black.cmp(&count.white) {
        std::cmp::Ordering::Greater => Outcome::Winner(Color::Black),
        std::cmp::Ordering::Less => Outcome::Winner(Color::White),
        std::cmp::Ordering::Equal => Outcome::Draw,
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::Position;
    use super::*;

    #[test]
    fn test_initial_counts() {
        let count = count_stones(&Board::initial());
        assert_eq!(count, StoneCount { black: 2, white: 2 });
        assert_eq!(count.empty(), 60);
    }

    #[test]
    fn test_initial_not_terminal_and_drawn() {
        let board = Board::initial();
        assert!(!is_terminal(&board));
        assert_eq!(outcome(&board), Outcome::Draw);
    }

    #[test]
    fn test_full_board_of_one_color() {
        let mut board = Board::empty();
        for pos in Position::all() {
            board.set(pos, Cell::Stone(Color::White));
        }
        assert!(is_terminal(&board));
        assert_eq!(outcome(&board), Outcome::Winner(Color::White));
        assert_eq!(count_stones(&board).empty(), 0);
    }

    #[test]
    fn test_empty_board_is_terminal_draw() {
        let board = Board::empty();
        assert!(is_terminal(&board));
        assert_eq!(outcome(&board), Outcome::Draw);
    }

    #[test]
    fn test_stranded_stones_end_the_game() {
        // Neither side can capture anything: no opposing stones are adjacent.
        let board: Board = "
            B.......
            ........
            ........
            ........
            ........
            ........
            ........
            .......W"
            .parse()
            .unwrap();
        assert!(is_terminal(&board));
        assert_eq!(outcome(&board), Outcome::Draw);
    }
}
