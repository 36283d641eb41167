//! Capture and legality rules.

use super::super::{Board, Cell, Color, MoveError, Position};
use tracing::{debug, instrument};

/// The eight compass directions as `(row, col)` steps.
const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Stones captured if `color` plays at `pos`.
///
/// In each direction, walks outward over opposing stones; the run is
/// captured only when it is non-empty and ends on a `color` stone (not the
/// edge, not an empty cell). Runs are concatenated in [`DIRECTIONS`] order.
/// Returns nothing when `pos` is occupied.
#[instrument(skip(board))]
pub fn captures(board: &Board, pos: Position, color: Color) -> Vec<Position> {
    if !board.is_empty(pos) {
        return Vec::new();
    }

    let opponent = Cell::Stone(color.opponent());
    let mut captured = Vec::new();

    for (dr, dc) in DIRECTIONS {
        let mut run = Vec::new();
        let mut next = pos.step(dr, dc);

        while let Some(p) = next
            && board.get(p) == opponent
        {
            run.push(p);
            next = p.step(dr, dc);
        }

        let anchored = next.is_some_and(|p| board.get(p) == Cell::Stone(color));
        if anchored && !run.is_empty() {
            captured.extend(run);
        }
    }

    captured
}

/// A move is legal iff it captures at least one stone.
pub fn is_legal(board: &Board, pos: Position, color: Color) -> bool {
    !captures(board, pos, color).is_empty()
}

/// All legal moves for `color`, scanning the board row-major.
#[instrument(skip(board))]
pub fn legal_moves(board: &Board, color: Color) -> Vec<Position> {
    Position::all()
        .filter(|pos| is_legal(board, *pos, color))
        .collect()
}

/// Places a stone and flips every captured stone.
///
/// Returns a new board; `board` itself is never modified.
///
/// # Errors
///
/// - [`MoveError::Occupied`] if `pos` already holds a stone.
/// - [`MoveError::NoCapture`] if the placement captures nothing.
#[instrument(skip(board))]
pub fn apply_move(board: &Board, pos: Position, color: Color) -> Result<Board, MoveError> {
    if !board.is_empty(pos) {
        return Err(MoveError::Occupied(pos));
    }

    let flips = captures(board, pos, color);
    if flips.is_empty() {
        return Err(MoveError::NoCapture {
            position: pos,
            color,
        });
    }

    let mut next = *board;
    next.set(pos, Cell::Stone(color));
    for flipped in &flips {
        next.set(*flipped, Cell::Stone(color));
    }

    debug!(flipped = flips.len(), "Stone placed");
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn test_initial_black_moves() {
        let board = Board::initial();
        assert_eq!(
            legal_moves(&board, Color::Black),
            vec![pos(2, 3), pos(3, 2), pos(4, 5), pos(5, 4)]
        );
    }

    #[test]
    fn test_initial_white_moves() {
        let board = Board::initial();
        assert_eq!(
            legal_moves(&board, Color::White),
            vec![pos(2, 4), pos(3, 5), pos(4, 2), pos(5, 3)]
        );
    }

    #[test]
    fn test_occupied_cell_captures_nothing() {
        let board = Board::initial();
        assert!(captures(&board, pos(3, 3), Color::Black).is_empty());
        assert_eq!(
            apply_move(&board, pos(3, 3), Color::Black),
            Err(MoveError::Occupied(pos(3, 3)))
        );
    }

    #[test]
    fn test_run_must_be_anchored() {
        // Black at a1 faces a white run that ends at the edge.
        let board: Board = "
            .WWWWWWW
            ........
            ........
            ........
            ........
            ........
            ........
            ........"
            .parse()
            .unwrap();
        assert!(captures(&board, pos(0, 0), Color::Black).is_empty());
    }

    #[test]
    fn test_run_ending_on_empty_is_not_captured() {
        let board: Board = "
            .WW.B...
            ........
            ........
            ........
            ........
            ........
            ........
            ........"
            .parse()
            .unwrap();
        assert!(captures(&board, pos(0, 0), Color::Black).is_empty());
    }

    #[test]
    fn test_multi_direction_capture() {
        let board: Board = "
            B.B.B...
            .WWW....
            BW.WB...
            .WWW....
            B.B.B...
            ........
            ........
            ........"
            .parse()
            .unwrap();
        let mut flips = captures(&board, pos(2, 2), Color::Black);
        flips.sort();
        assert_eq!(
            flips,
            vec![
                pos(1, 1),
                pos(1, 2),
                pos(1, 3),
                pos(2, 1),
                pos(2, 3),
                pos(3, 1),
                pos(3, 2),
                pos(3, 3),
            ]
        );

        let next = apply_move(&board, pos(2, 2), Color::Black).unwrap();
        assert_eq!(next.count().white, 0);
        assert_eq!(next.count().black, 17);
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let board = Board::initial();
        let next = apply_move(&board, pos(2, 3), Color::Black).unwrap();
        assert_eq!(board, Board::initial());
        assert_ne!(next, board);
    }
}
