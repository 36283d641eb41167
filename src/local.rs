//! Two players sharing one board.

use crate::games::reversi::{GameState, Move, MoveError, Position};
use crate::move_log::{ClientError, MoveLog};
use crate::outbox::{Effect, Outbox};
use crate::{CapabilitySecret, GameId};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Optional copy of every local move on a move log.
#[derive(Debug)]
struct Mirror {
    log: Arc<dyn MoveLog>,
    outbox: Outbox,
    game: Option<(GameId, CapabilitySecret)>,
    sent: u32,
}

impl Mirror {
    /// Queues a played move. The log checks secrets by sequence parity and
    /// no joiner ever exists, so even-numbered moves carry no secret.
    fn record(&mut self, mv: Move, next: &GameState) {
        let Some((game_id, secret)) = &self.game else {
            return;
        };
        self.sent += 1;
        let secret = (self.sent % 2 == 1).then(|| secret.clone());
        self.outbox.dispatch(Effect::for_move(game_id, mv, secret, next));
    }
}

/// Runs a local game, optionally mirroring it to a move log.
///
/// Whoever is on turn plays; the rules alone decide what is legal.
#[derive(Debug)]
pub struct LocalController {
    game: GameState,
    started: bool,
    mirror: Option<Mirror>,
}

impl LocalController {
    /// Creates an unmirrored controller.
    #[instrument]
    pub fn new() -> Self {
        Self {
            game: GameState::new(),
            started: false,
            mirror: None,
        }
    }

    /// Creates a controller that records its game on `log`.
    /// Must be called inside a tokio runtime.
    #[instrument(skip(log))]
    pub fn mirrored(log: Arc<dyn MoveLog>) -> Self {
        let outbox = Outbox::spawn(Arc::clone(&log));
        Self {
            game: GameState::new(),
            started: false,
            mirror: Some(Mirror {
                log,
                outbox,
                game: None,
                sent: 0,
            }),
        }
    }

    /// Returns the current game.
    pub fn state(&self) -> &GameState {
        &self.game
    }

    /// Whether [`LocalController::start`] has succeeded since the last restart.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Begins a fresh game, registering it on the mirror if there is one.
    ///
    /// # Errors
    ///
    /// Returns the log's error when the mirror cannot create the game;
    /// the controller stays un-started.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<&GameState, ClientError> {
        let mut game = GameState::new();

        if let Some(mirror) = self.mirror.as_mut() {
            let created = mirror.log.create_game().await.inspect_err(|e| {
                error!(error = %e, "Failed to create mirrored game");
            })?;
            info!(game_id = %created.game_id, "Mirroring local game");
            game = game.with_game_id(created.game_id.clone());
            mirror.game = Some((created.game_id, created.secret));
            mirror.sent = 0;
        }

        self.game = game;
        self.started = true;
        Ok(&self.game)
    }

    /// Plays for the side on turn.
    ///
    /// # Errors
    ///
    /// Whatever the rules reject the placement with. State is unchanged.
    #[instrument(skip(self), fields(player = %self.game.current_player()))]
    pub fn submit_move(&mut self, pos: Position) -> Result<&GameState, MoveError> {
        let mv = Move::new(pos, self.game.current_player());
        let next = self.game.apply(mv).inspect_err(|e| {
            debug!(error = %e, "Move rejected");
        })?;

        if let Some(mirror) = self.mirror.as_mut() {
            mirror.record(mv, &next);
        }

        self.game = next;
        Ok(&self.game)
    }

    /// Drops the current game. A new one needs [`LocalController::start`].
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        info!("Restarting local game");
        self.game = GameState::new();
        self.started = false;
        if let Some(mirror) = self.mirror.as_mut() {
            mirror.game = None;
            mirror.sent = 0;
        }
    }

    /// Waits until mirrored moves have been delivered.
    pub async fn flush(&self) {
        if let Some(mirror) = &self.mirror {
            mirror.outbox.flush().await;
        }
    }
}

impl Default for LocalController {
    fn default() -> Self {
        Self::new()
    }
}
