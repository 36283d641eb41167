//! Async driver around [`RemoteSession`].

use super::poller::{PollHandle, PollTarget, PolledBatch};
use super::sync::{RemoteSession, Transition};
use crate::GameId;
use crate::games::reversi::{GameState, MoveError, Position};
use crate::move_log::{ClientError, MoveLog};
use crate::outbox::Outbox;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};

/// Drives one side of a remote game against a [`MoveLog`].
///
/// Owns all game state; background tasks only ever send messages back.
#[derive(Debug)]
pub struct RemoteController {
    log: Arc<dyn MoveLog>,
    outbox: Outbox,
    poll_interval: Duration,
    session: Option<RemoteSession>,
    target: watch::Sender<Option<PollTarget>>,
    poller: Option<PollHandle>,
    lobby_error: Option<String>,
}

impl RemoteController {
    /// Creates a controller with no game. Must be called inside a tokio runtime.
    #[instrument(skip(log))]
    pub fn new(log: Arc<dyn MoveLog>, poll_interval: Duration) -> Self {
        let outbox = Outbox::spawn(Arc::clone(&log));
        let (target, _) = watch::channel(None);
        Self {
            log,
            outbox,
            poll_interval,
            session: None,
            target,
            poller: None,
            lobby_error: None,
        }
    }

    /// Returns the active session.
    pub fn session(&self) -> Option<&RemoteSession> {
        self.session.as_ref()
    }

    /// Returns the active game.
    pub fn game(&self) -> Option<&GameState> {
        self.session.as_ref().map(RemoteSession::game)
    }

    /// Returns the last create/join failure.
    pub fn lobby_error(&self) -> Option<&str> {
        self.lobby_error.as_deref()
    }

    /// Creates a game on the log and plays it as black.
    ///
    /// # Errors
    ///
    /// Returns the log's error, which is also kept as the lobby error.
    #[instrument(skip(self))]
    pub async fn create(&mut self) -> Result<&RemoteSession, ClientError> {
        match self.log.create_game().await {
            Ok(created) => {
                info!(game_id = %created.game_id, "Game created");
                Ok(self.install(RemoteSession::hosted(created.game_id, created.secret)))
            }
            Err(e) => Err(self.lobby_failure(e)),
        }
    }

    /// Joins an existing game as white.
    ///
    /// # Errors
    ///
    /// Returns the log's error, which is also kept as the lobby error.
    #[instrument(skip(self))]
    pub async fn join(&mut self, game_id: GameId) -> Result<&RemoteSession, ClientError> {
        match self.log.join_game(&game_id).await {
            Ok(joined) => {
                info!(game_id = %game_id, "Game joined");
                Ok(self.install(RemoteSession::joined(game_id, joined.secret)))
            }
            Err(e) => Err(self.lobby_failure(e)),
        }
    }

    /// Plays a local move and queues it for the log.
    ///
    /// # Errors
    ///
    /// [`MoveError::NoGame`] without a session, otherwise as
    /// [`RemoteSession::submit`]. State is unchanged on error.
    #[instrument(skip(self))]
    pub fn submit_move(&mut self, pos: Position) -> Result<&GameState, MoveError> {
        let session = self.session.as_ref().ok_or(MoveError::NoGame)?;
        let Transition { session, effects } = session.submit(pos).inspect_err(|e| {
            debug!(error = %e, "Move rejected");
        })?;
        self.outbox.dispatch(effects);
        Ok(self.install(session).game())
    }

    /// Starts background polling and returns the stream of batches.
    ///
    /// Replaces any earlier poller. Feed every batch to
    /// [`RemoteController::apply_batch`].
    #[instrument(skip(self))]
    pub fn start_polling(&mut self) -> mpsc::UnboundedReceiver<PolledBatch> {
        let (handle, batches) = PollHandle::spawn(
            Arc::clone(&self.log),
            self.poll_interval,
            self.target.subscribe(),
        );
        self.poller = Some(handle);
        batches
    }

    /// Reconciles a polled batch. Returns whether the game changed.
    #[instrument(skip(self, batch), fields(game_id = %batch.game_id, after = batch.after))]
    pub fn apply_batch(&mut self, batch: PolledBatch) -> bool {
        let Some(current) = self.session.as_ref() else {
            debug!("Batch arrived without a game, ignored");
            return false;
        };
        if batch.game_id != *current.game_id() {
            debug!("Batch for a previous game, ignored");
            return false;
        }

        let Transition { session, effects } = current.reconcile(&batch.moves);
        let changed = session.game() != current.game();
        self.outbox.dispatch(effects);
        self.install(session);
        changed
    }

    /// Polls once and reconciles. Returns whether the game changed.
    ///
    /// A failed poll is logged and recorded on the session.
    #[instrument(skip(self))]
    pub async fn poll_once(&mut self) -> bool {
        let Some(current) = self.session.as_ref().filter(|s| s.should_poll()) else {
            return false;
        };
        let game_id = current.game_id().clone();
        let after = current.peer().cursor();

        match self.log.poll_moves(&game_id, after).await {
            Ok(moves) => self.apply_batch(PolledBatch {
                game_id,
                after,
                moves,
            }),
            Err(e) => {
                warn!(error = %e, "Poll failed");
                if let Some(session) = self.session.as_mut() {
                    session.record_transport_error(e);
                }
                false
            }
        }
    }

    /// Waits until queued effects have been delivered.
    pub async fn flush(&self) {
        self.outbox.flush().await;
    }

    /// Abandons the current game.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        info!("Leaving remote game");
        self.poller = None;
        self.session = None;
        self.lobby_error = None;
        self.target.send_replace(None);
    }

    fn install(&mut self, session: RemoteSession) -> &RemoteSession {
        self.lobby_error = None;
        let target = session.should_poll().then(|| PollTarget {
            game_id: session.game_id().clone(),
            after: session.peer().cursor(),
        });
        self.target.send_replace(target);
        self.session.insert(session)
    }

    fn lobby_failure(&mut self, e: ClientError) -> ClientError {
        error!(error = %e, "Lobby request failed");
        self.lobby_error = Some(e.message.clone());
        e
    }
}
