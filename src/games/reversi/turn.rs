//! Turn resolution: whose move is next, automatic passes, game end.
//!
//! States are replaced wholesale on every accepted move. A rejected move
//! returns an error and the caller keeps the state it already holds.

use super::{Board, Color, Move, MoveError, Outcome, Position, StoneCount};
use crate::GameId;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Coarse phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    /// The given color is to move and has at least one legal move.
    InProgress(Color),
    /// Neither color can move.
    Terminal(Outcome),
}

/// Complete, turn-resolved game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    board: Board,
    current_player: Color,
    is_game_over: bool,
    count: StoneCount,
    winner: Option<Outcome>,
    valid_moves: Vec<Position>,
    last_move: Option<Position>,
    game_id: Option<GameId>,
}

impl GameState {
    /// Creates a fresh game: initial board, black to move.
    #[instrument]
    pub fn new() -> Self {
        let board = Board::initial();
        Self {
            board,
            current_player: Color::Black,
            is_game_over: false,
            count: board.count(),
            winner: None,
            valid_moves: board.legal_moves(Color::Black),
            last_move: None,
            game_id: None,
        }
    }

    /// Resolves an arbitrary position with `to_move` nominally on turn.
    ///
    /// Applies the same pass rule as [`advance`]: if `to_move` is stuck but the
    /// opponent is not, the opponent moves.
    #[instrument(skip(board))]
    pub fn from_position(board: Board, to_move: Color) -> Self {
        advance(board, to_move.opponent(), None, None)
    }

    /// Attaches the move log's identifier.
    pub fn with_game_id(mut self, game_id: GameId) -> Self {
        self.game_id = Some(game_id);
        self
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the color to move (on a finished game, the last mover's opponent).
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    /// Returns true once neither color can move.
    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    /// Returns the stone totals.
    pub fn count(&self) -> StoneCount {
        self.count
    }

    /// Black stones on the board.
    pub fn black_count(&self) -> u8 {
        self.count.black
    }

    /// White stones on the board.
    pub fn white_count(&self) -> u8 {
        self.count.white
    }

    /// Returns the result, set only when the game is over.
    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    /// Legal moves for the current player; empty when the game is over.
    pub fn valid_moves(&self) -> &[Position] {
        &self.valid_moves
    }

    /// Returns the most recent placement.
    pub fn last_move(&self) -> Option<Position> {
        self.last_move
    }

    /// Returns the move log identifier, if the game is tracked remotely.
    pub fn game_id(&self) -> Option<&GameId> {
        self.game_id.as_ref()
    }

    /// Returns the phase.
    pub fn phase(&self) -> Phase {
        match self.winner {
            Some(outcome) if self.is_game_over => Phase::Terminal(outcome),
            _ => Phase::InProgress(self.current_player),
        }
    }

    /// Plays for the current player.
    ///
    /// # Errors
    ///
    /// [`MoveError::GameOver`] on a finished game, otherwise whatever the
    /// board rejects the placement with.
    #[instrument(skip(self), fields(player = %self.current_player))]
    pub fn play(&self, pos: Position) -> Result<Self, MoveError> {
        self.apply(Move::new(pos, self.current_player))
    }

    /// Plays a move with its own explicit color.
    ///
    /// Used for moves replayed from the move log, where the mover's color
    /// comes with the move rather than from the local turn.
    ///
    /// # Errors
    ///
    /// As [`GameState::play`].
    #[instrument(skip(self), fields(game_id = ?self.game_id))]
    pub fn apply(&self, mv: Move) -> Result<Self, MoveError> {
        if self.is_game_over {
            return Err(MoveError::GameOver);
        }
        let board = self.board.apply_move(mv.position, mv.color)?;
        Ok(advance(
            board,
            mv.color,
            Some(mv.position),
            self.game_id.clone(),
        ))
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the state that follows `just_moved` placing a stone on `board`.
///
/// 1. If neither color can move, the game is over.
/// 2. Otherwise, if the opponent can move, it is the opponent's turn.
/// 3. Otherwise the opponent passes and `just_moved` moves again.
///
/// A player is only ever skipped silently; the game ends only when both
/// colors are stuck at once.
#[instrument(skip(board, game_id))]
pub fn advance(
    board: Board,
    just_moved: Color,
    last_move: Option<Position>,
    game_id: Option<GameId>,
) -> GameState {
    let count = board.count();
    let next = just_moved.opponent();

    if board.is_terminal() {
        let outcome = board.outcome();
        info!(black = count.black, white = count.white, %outcome, "Game over");
        return GameState {
            board,
            current_player: next,
            is_game_over: true,
            count,
            winner: Some(outcome),
            valid_moves: Vec::new(),
            last_move,
            game_id,
        };
    }

    let next_moves = board.legal_moves(next);
    let (current_player, valid_moves) = if next_moves.is_empty() {
        debug!(passed = %next, "No legal move, turn skipped");
        (just_moved, board.legal_moves(just_moved))
    } else {
        (next, next_moves)
    };

    GameState {
        board,
        current_player,
        is_game_over: false,
        count,
        winner: None,
        valid_moves,
        last_move,
        game_id,
    }
}
