//! Tests for the board engine and turn resolver through the public API.

use strictly_reversi::{
    BOARD_SIZE, Board, Cell, Color, GameState, MoveError, Outcome, Phase, Position, StoneCount,
};

fn pos(row: u8, col: u8) -> Position {
    Position::new(row, col).expect("on board")
}

/// Plays a deterministic game to the end, choosing moves by a rotating index.
fn playout(stride: usize) -> Vec<GameState> {
    let mut states = vec![GameState::new()];
    let mut turn = 0usize;
    loop {
        let current = states.last().expect("non-empty");
        if current.is_game_over() {
            return states;
        }
        let moves = current.valid_moves();
        let choice = moves[(turn * stride) % moves.len()];
        let next = current.play(choice).expect("valid move accepted");
        states.push(next);
        turn += 1;
    }
}

#[test]
fn test_initial_state() {
    let game = GameState::new();
    assert_eq!(game.current_player(), Color::Black);
    assert_eq!(game.valid_moves().len(), 4);
    assert_eq!((game.black_count(), game.white_count()), (2, 2));
    assert_eq!(game.phase(), Phase::InProgress(Color::Black));
    assert!(game.winner().is_none());
}

#[test]
fn test_opening_move_flips_one_stone() {
    let game = GameState::new();
    let next = game.play(pos(2, 3)).unwrap();

    assert_eq!(next.board().get(pos(3, 3)), Cell::Stone(Color::Black));
    assert_eq!((next.black_count(), next.white_count()), (4, 1));
    assert_eq!(next.current_player(), Color::White);
    assert_eq!(next.last_move(), Some(pos(2, 3)));
    assert!(!next.is_game_over());
}

#[test]
fn test_corner_move_rejected_without_change() {
    let game = GameState::new();
    let err = game.play(pos(0, 0)).unwrap_err();

    assert_eq!(
        err,
        MoveError::NoCapture {
            position: pos(0, 0),
            color: Color::Black
        }
    );
    assert_eq!(game, GameState::new());
}

#[test]
fn test_occupied_square_rejected() {
    let game = GameState::new();
    assert_eq!(
        game.play(pos(3, 3)).unwrap_err(),
        MoveError::Occupied(pos(3, 3))
    );
}

/// Checks every legal move on `board`: each captured stone is an opposing
/// stone on a straight, gap-free run from the move to a stone of the mover.
fn assert_captures_anchored(board: &Board) {
    for color in [Color::Black, Color::White] {
        for mv in board.legal_moves(color) {
            let captured = board.captures(mv, color);
            assert!(!captured.is_empty());
            for &stone in &captured {
                assert_eq!(board.get(stone), Cell::Stone(color.opponent()));
                let dr = (stone.row() as i8 - mv.row() as i8).signum();
                let dc = (stone.col() as i8 - mv.col() as i8).signum();
                let (rows, cols) = (
                    stone.row().abs_diff(mv.row()),
                    stone.col().abs_diff(mv.col()),
                );
                assert!(rows == 0 || cols == 0 || rows == cols, "not on a line");

                // Walk from the move: every cell up to the anchor is captured.
                let mut cursor = mv.step(dr, dc).expect("adjacent cell");
                while board.get(cursor) == Cell::Stone(color.opponent()) {
                    assert!(captured.contains(&cursor), "gap in run");
                    cursor = cursor.step(dr, dc).expect("run stays on board");
                }
                assert_eq!(board.get(cursor), Cell::Stone(color));
            }
        }
    }
}

#[test]
fn test_captures_lie_between_move_and_anchor() {
    for stride in [1, 3, 7] {
        for state in playout(stride) {
            assert_captures_anchored(state.board());
        }
    }

    let star: Board = "
        B . B . B . . .
        . W W W . . . .
        B W . W B . . .
        . W W W . . . .
        B . B . B . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
    "
    .parse()
    .unwrap();
    assert_eq!(star.captures(pos(2, 2), Color::Black).len(), 8);
    assert_captures_anchored(&star);
}

#[test]
fn test_legal_moves_is_pure() {
    let board = Board::initial();
    let before = board;
    let first = board.legal_moves(Color::White);
    let second = board.legal_moves(Color::White);
    assert_eq!(first, second);
    assert_eq!(board, before);
}

#[test]
fn test_playout_invariants() {
    for stride in [1, 3, 7] {
        let states = playout(stride);
        let last = states.last().expect("non-empty");
        assert!(last.is_game_over());
        assert!(last.valid_moves().is_empty());
        assert!(matches!(last.phase(), Phase::Terminal(_)));

        for state in &states {
            let count = state.count();
            let empty = state.board().empty_count() as usize;
            assert_eq!(
                count.black as usize + count.white as usize + empty,
                BOARD_SIZE * BOARD_SIZE
            );
            if !state.is_game_over() {
                assert!(!state.valid_moves().is_empty());
                assert_eq!(
                    state.valid_moves(),
                    state.board().legal_moves(state.current_player()).as_slice()
                );
            }
            assert_eq!(
                state.is_game_over(),
                state.board().legal_moves(Color::Black).is_empty()
                    && state.board().legal_moves(Color::White).is_empty()
            );
        }
    }
}

#[test]
fn test_finished_game_rejects_moves() {
    let states = playout(1);
    let last = states.last().expect("non-empty");
    let any = Position::all().next().expect("64 cells");
    assert_eq!(last.play(any).unwrap_err(), MoveError::GameOver);
}

#[test]
fn test_stuck_opponent_is_skipped() {
    let board: Board = "
        B W . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . W B
    "
    .parse()
    .unwrap();

    let game = GameState::from_position(board, Color::Black);
    assert_eq!(game.valid_moves(), &[pos(0, 2), pos(7, 5)]);

    // White cannot answer, so black moves again.
    let next = game.play(pos(0, 2)).unwrap();
    assert!(!next.is_game_over());
    assert_eq!(next.current_player(), Color::Black);
    assert_eq!(next.valid_moves(), &[pos(7, 5)]);

    let done = next.play(pos(7, 5)).unwrap();
    assert!(done.is_game_over());
    assert_eq!(done.winner(), Some(Outcome::Winner(Color::Black)));
    assert_eq!((done.black_count(), done.white_count()), (6, 0));
}

#[test]
fn test_stuck_side_to_move_passes_at_start() {
    let board: Board = "
        B W . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
    "
    .parse()
    .unwrap();

    let game = GameState::from_position(board, Color::White);
    assert_eq!(game.current_player(), Color::Black);
    assert_eq!(game.valid_moves(), &[pos(0, 2)]);
}

#[test]
fn test_board_of_one_color_is_won() {
    let board: Board = "W".repeat(64).parse().unwrap();
    assert!(board.is_terminal());
    assert_eq!(board.outcome(), Outcome::Winner(Color::White));

    let game = GameState::from_position(board, Color::Black);
    assert!(game.is_game_over());
    assert_eq!(game.phase(), Phase::Terminal(Outcome::Winner(Color::White)));
}

#[test]
fn test_board_diagram_rejects_bad_input() {
    assert!("B".repeat(63).parse::<Board>().is_err());
    assert!("X".repeat(64).parse::<Board>().is_err());
}

#[test]
fn test_empty_count_saturates_on_overfull_totals() {
    assert_eq!(StoneCount { black: 2, white: 2 }.empty(), 60);
    assert_eq!(StoneCount { black: 60, white: 10 }.empty(), 0);
    assert_eq!(StoneCount { black: 200, white: 0 }.empty(), 0);
}
