//! Pure reconciliation of local optimistic moves with the move log.
//!
//! [`RemoteSession`] never performs I/O. Every operation returns the next
//! session together with the [`Effect`]s the caller should deliver.

use super::peer::PeerState;
use crate::games::reversi::{GameState, Move, MoveError, Position};
use crate::move_log::{ClientError, RemoteMove};
use crate::outbox::Effect;
use crate::{CapabilitySecret, GameId};
use tracing::{debug, info, instrument, warn};

/// Problem detected while following the move log.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SyncError {
    /// A logged move cannot be applied to the local board.
    #[display("Move {} diverges from the local board: {}", sequence, reason)]
    Desync {
        /// Sequence number of the offending move.
        sequence: u32,
        /// What was wrong with it.
        reason: String,
    },
    /// The log skipped sequence numbers.
    #[display("Expected move {} but the log returned {}", expected, found)]
    Gap {
        /// Next sequence number the session can apply.
        expected: u32,
        /// Lowest sequence number actually returned.
        found: u32,
    },
    /// The poll request itself failed.
    #[display("Poll failed: {}", _0)]
    Transport(ClientError),
}

impl std::error::Error for SyncError {}

/// A session's next value and the effects it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The session after the operation.
    pub session: RemoteSession,
    /// Network work for the caller, in order.
    pub effects: Vec<Effect>,
}

/// One side of a remote game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSession {
    game_id: GameId,
    game: GameState,
    peer: PeerState,
    last_error: Option<SyncError>,
}

impl RemoteSession {
    /// Session for the side that created `game_id`.
    #[instrument(skip(secret))]
    pub fn hosted(game_id: GameId, secret: CapabilitySecret) -> Self {
        info!("Hosting remote game");
        Self::with_peer(game_id, PeerState::initiator(secret))
    }

    /// Session for the side that joined `game_id`.
    #[instrument(skip(secret))]
    pub fn joined(game_id: GameId, secret: CapabilitySecret) -> Self {
        info!("Joined remote game");
        Self::with_peer(game_id, PeerState::joiner(secret))
    }

    fn with_peer(game_id: GameId, peer: PeerState) -> Self {
        Self {
            game: GameState::new().with_game_id(game_id.clone()),
            game_id,
            peer,
            last_error: None,
        }
    }

    /// Returns the log identifier.
    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Returns the local game.
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Returns this side's participation state.
    pub fn peer(&self) -> &PeerState {
        &self.peer
    }

    /// Returns the most recent sync problem, cleared by a clean poll.
    pub fn last_error(&self) -> Option<&SyncError> {
        self.last_error.as_ref()
    }

    /// Whether the log should be polled right now.
    ///
    /// Not while it is our turn and the opponent is known to be present:
    /// nothing can be appended until we move.
    pub fn should_poll(&self) -> bool {
        if self.game.is_game_over() {
            return false;
        }
        !(self.peer.is_my_turn() && !self.peer.waiting_for_opponent())
    }

    /// Plays a local move optimistically.
    ///
    /// # Errors
    ///
    /// [`MoveError::NotYourTurn`] when the other side is on turn, otherwise
    /// whatever the rules reject the placement with.
    #[instrument(skip(self), fields(game_id = %self.game_id, cursor = self.peer.cursor()))]
    pub fn submit(&self, pos: Position) -> Result<Transition, MoveError> {
        let color = self.peer.my_color();
        if !self.peer.is_my_turn() {
            debug!(%color, "Move attempted off turn");
            return Err(MoveError::NotYourTurn(color));
        }

        let mv = Move::new(pos, color);
        let game = self.game.apply(mv)?;
        let effects = Effect::for_move(
            &self.game_id,
            mv,
            Some(self.peer.secret().clone()),
            &game,
        );

        let mut session = self.clone();
        session.peer.advance_cursor(self.peer.cursor() + 1);
        session.peer.sync_turn(&game);
        session.game = game;

        info!(
            position = %pos,
            sequence = session.peer.cursor(),
            is_my_turn = session.peer.is_my_turn(),
            "Local move applied"
        );
        Ok(Transition { session, effects })
    }

    /// Applies moves read from the log.
    ///
    /// Moves for other games and moves at or below the cursor are ignored.
    /// The rest are applied in sequence order with their own colors until
    /// one fails, which is recorded in `last_error` without advancing the
    /// cursor past it.
    #[instrument(
        skip(self, moves),
        fields(game_id = %self.game_id, cursor = self.peer.cursor(), batch = moves.len())
    )]
    pub fn reconcile(&self, moves: &[RemoteMove]) -> Transition {
        let mut fresh: Vec<&RemoteMove> = moves
            .iter()
            .filter(|m| m.game_id == self.game_id && m.sequence > self.peer.cursor())
            .collect();
        fresh.sort_by_key(|m| m.sequence);
        fresh.dedup_by_key(|m| m.sequence);

        let mut game = self.game.clone();
        let mut cursor = self.peer.cursor();
        let mut error = None;

        for remote in fresh {
            if remote.sequence != cursor + 1 {
                error = Some(SyncError::Gap {
                    expected: cursor + 1,
                    found: remote.sequence,
                });
                break;
            }
            let Some(mv) = remote.to_move() else {
                error = Some(SyncError::Desync {
                    sequence: remote.sequence,
                    reason: format!("({}, {}) is off the board", remote.row, remote.col),
                });
                break;
            };
            match game.apply(mv) {
                Ok(next) => {
                    debug!(sequence = remote.sequence, %mv, "Applied logged move");
                    game = next;
                    cursor = remote.sequence;
                }
                Err(e) => {
                    error = Some(SyncError::Desync {
                        sequence: remote.sequence,
                        reason: e.to_string(),
                    });
                    break;
                }
            }
        }

        if let Some(e) = &error {
            warn!(error = %e, "Reconciliation stopped");
        }

        let mut session = self.clone();
        session.last_error = error;
        let mut effects = Vec::new();

        if cursor > self.peer.cursor() {
            session.peer.advance_cursor(cursor);
            session.peer.opponent_seen();
            session.peer.sync_turn(&game);
            if game.is_game_over() {
                effects.push(Effect::report(&self.game_id, &game));
            }
            session.game = game;
            info!(
                cursor,
                is_my_turn = session.peer.is_my_turn(),
                "Caught up with move log"
            );
        }

        Transition { session, effects }
    }

    /// Records a failed poll. The game is left as it is.
    pub(crate) fn record_transport_error(&mut self, error: ClientError) {
        self.last_error = Some(SyncError::Transport(error));
    }
}
