//! Tests for two-player local games.

use std::sync::Arc;
use strictly_reversi::{Color, GameState, InMemoryMoveLog, LocalController, MoveError, Position};

fn pos(row: u8, col: u8) -> Position {
    Position::new(row, col).expect("on board")
}

#[tokio::test]
async fn test_local_turns_alternate() {
    let mut controller = LocalController::new();
    assert!(!controller.is_started());
    controller.start().await.expect("no mirror to fail");
    assert!(controller.is_started());

    assert_eq!(controller.submit_move(pos(2, 3)).unwrap().current_player(), Color::White);
    assert_eq!(controller.submit_move(pos(2, 2)).unwrap().current_player(), Color::Black);
    assert_eq!(controller.state().game_id(), None);
}

#[tokio::test]
async fn test_rejected_move_keeps_state() {
    let mut controller = LocalController::new();
    controller.start().await.expect("no mirror to fail");

    let err = controller.submit_move(pos(0, 0)).unwrap_err();
    assert!(matches!(err, MoveError::NoCapture { .. }));
    assert_eq!(controller.state(), &GameState::new());
}

#[tokio::test]
async fn test_restart_returns_to_lobby() {
    let mut controller = LocalController::new();
    controller.start().await.expect("no mirror to fail");
    controller.submit_move(pos(2, 3)).expect("legal");

    controller.restart();
    assert!(!controller.is_started());
    assert_eq!(controller.state(), &GameState::new());
}

#[tokio::test]
async fn test_mirrored_moves_recorded() {
    let log = InMemoryMoveLog::new();
    let mut controller = LocalController::mirrored(Arc::new(log.clone()));

    let game_id = controller
        .start()
        .await
        .expect("create")
        .game_id()
        .cloned()
        .expect("mirrored game has an id");
    controller.submit_move(pos(2, 3)).expect("legal");
    controller.submit_move(pos(2, 2)).expect("legal");
    controller.flush().await;

    let recorded: Vec<(u32, Color)> = log
        .moves(&game_id)
        .iter()
        .map(|m| (m.sequence, m.color))
        .collect();
    assert_eq!(recorded, vec![(1, Color::Black), (2, Color::White)]);
}

#[tokio::test]
async fn test_mirrored_game_with_passes_fully_recorded() {
    let log = InMemoryMoveLog::new();
    let mut controller = LocalController::mirrored(Arc::new(log.clone()));
    let game_id = controller
        .start()
        .await
        .expect("create")
        .game_id()
        .cloned()
        .expect("mirrored game has an id");

    // Always taking the first legal move forces several passes, so colors
    // and sequence parity stop lining up partway through.
    let mut played = 0u32;
    let mut passes = 0;
    while !controller.state().is_game_over() {
        let mover = controller.state().current_player();
        let choice = controller.state().valid_moves()[0];
        let next = controller.submit_move(choice).expect("valid move accepted");
        if !next.is_game_over() && next.current_player() == mover {
            passes += 1;
        }
        played += 1;
    }
    controller.flush().await;
    assert!(passes > 0);

    let sequences: Vec<u32> = log.moves(&game_id).iter().map(|m| m.sequence).collect();
    assert_eq!(sequences, (1..=played).collect::<Vec<_>>());
    assert_eq!(log.result(&game_id), Some(controller.state().count()));
}

#[tokio::test]
async fn test_mirror_failure_keeps_lobby() {
    let log = InMemoryMoveLog::new();
    log.set_offline(true);
    let mut controller = LocalController::mirrored(Arc::new(log.clone()));

    assert!(controller.start().await.is_err());
    assert!(!controller.is_started());
}
