//! The remote move log: an append-only, strictly ordered record of moves.
//!
//! The core never authors the log's contents; it submits moves and polls
//! for what other participants appended. [`MoveLog`] is the seam, with an
//! HTTP implementation for real servers and an in-memory one for tests and
//! offline hosts.

mod error;
mod http;
mod memory;
mod wire;

pub use error::ClientError;
pub use http::HttpMoveLog;
pub use memory::InMemoryMoveLog;

use crate::games::reversi::{Color, Move, Position, StoneCount};
use crate::{CapabilitySecret, GameId};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// A freshly created game and the initiator's secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedGame {
    /// Identifier to share with the joiner.
    pub game_id: GameId,
    /// Authorizes the initiator's moves.
    pub secret: CapabilitySecret,
}

/// Result of joining a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedGame {
    /// Authorizes the joiner's moves.
    pub secret: CapabilitySecret,
}

/// A move sent to the log.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MoveSubmission {
    /// Target game.
    pub game_id: GameId,
    /// Color that moved.
    pub color: Color,
    /// Where the stone was placed.
    pub position: Position,
    /// Role secret, when the game requires one.
    pub secret: Option<CapabilitySecret>,
}

/// Final score sent to the log when a game ends.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct ResultReport {
    /// Target game.
    pub game_id: GameId,
    /// Final stone totals.
    pub count: StoneCount,
}

/// Acknowledgement of a submission or report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ack {
    /// Whether the log recorded the request.
    pub accepted: bool,
    /// Server explanation, usually on rejection.
    pub message: Option<String>,
}

impl Ack {
    /// A plain acceptance.
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            message: None,
        }
    }

    /// A rejection with a reason.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            accepted: false,
            message: Some(message.into()),
        }
    }
}

/// A move as read back from the log.
///
/// Coordinates are kept raw: a log entry pointing off the board is a
/// divergence to report, not something to drop during decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMove {
    /// Game the move belongs to.
    pub game_id: GameId,
    /// Color that moved.
    pub color: Color,
    /// Row as recorded.
    pub row: i32,
    /// Column as recorded.
    pub col: i32,
    /// Position in the log, starting at 1.
    pub sequence: u32,
}

impl RemoteMove {
    /// Creates a log entry for an on-board move.
    pub fn new(game_id: GameId, mv: Move, sequence: u32) -> Self {
        Self {
            game_id,
            color: mv.color,
            row: mv.position.row() as i32,
            col: mv.position.col() as i32,
            sequence,
        }
    }

    /// The board position, or `None` if the coordinates are off the board.
    pub fn position(&self) -> Option<Position> {
        let row = u8::try_from(self.row).ok()?;
        let col = u8::try_from(self.col).ok()?;
        Position::new(row, col)
    }

    /// The move, or `None` if the coordinates are off the board.
    pub fn to_move(&self) -> Option<Move> {
        self.position().map(|pos| Move::new(pos, self.color))
    }
}

/// Operations the core consumes from the move log.
///
/// Implementations must return polled moves ordered by sequence number.
#[async_trait::async_trait]
pub trait MoveLog: Send + Sync + std::fmt::Debug {
    /// Creates a game and returns its id with the initiator's secret.
    async fn create_game(&self) -> Result<CreatedGame, ClientError>;

    /// Joins an existing game as the second participant.
    async fn join_game(&self, game_id: &GameId) -> Result<JoinedGame, ClientError>;

    /// Appends a move.
    async fn submit_move(&self, submission: &MoveSubmission) -> Result<Ack, ClientError>;

    /// Records the final score.
    async fn report_result(&self, report: &ResultReport) -> Result<Ack, ClientError>;

    /// Returns every move with a sequence number greater than `after`.
    async fn poll_moves(&self, game_id: &GameId, after: u32)
    -> Result<Vec<RemoteMove>, ClientError>;
}
