//! Strictly Reversi library - a Reversi engine with remote move-log sync
//!
//! # Architecture
//!
//! - **Games**: board rules and turn resolution, free of I/O
//! - **Move log**: the append-only record two remote players share
//!   (HTTP or in-memory)
//! - **Remote**: optimistic local moves reconciled with the polled log
//! - **Local**: two players at one board, optionally mirrored to a log
//!
//! # Example
//!
//! ```
//! use strictly_reversi::{Color, GameState, Position};
//!
//! let game = GameState::new();
//! let next = game.play(Position::new(2, 3).unwrap()).unwrap();
//! assert_eq!(next.current_player(), Color::White);
//! assert_eq!((next.black_count(), next.white_count()), (4, 1));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod games;
mod ids;
mod local;
mod move_log;
mod outbox;
mod remote;

// Crate-level exports - Configuration
pub use config::{ClientConfig, ConfigError, SERVER_URL_ENV};

// Crate-level exports - Identifiers
pub use ids::{CapabilitySecret, GameId};

// Crate-level exports - Game types
pub use games::reversi::{
    BOARD_SIZE, Board, Cell, Color, GameState, Move, MoveError, Outcome, ParseBoardError,
    ParsePositionError, Phase, Position, StoneCount, advance, rules,
};

// Crate-level exports - Move log
pub use move_log::{
    Ack, ClientError, CreatedGame, HttpMoveLog, InMemoryMoveLog, JoinedGame, MoveLog,
    MoveSubmission, RemoteMove, ResultReport,
};

// Crate-level exports - Controllers
pub use local::LocalController;
pub use outbox::{Effect, Outbox};
pub use remote::{
    PeerState, PollHandle, PollTarget, PolledBatch, RemoteController, RemoteSession, Role,
    SyncError, Transition,
};
