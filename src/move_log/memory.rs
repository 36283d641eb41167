//! In-process move log.
//!
//! Behaves like the HTTP server: uuid ids and secrets, one joiner per game,
//! sequence numbers assigned on arrival. Secrets are checked by sequence
//! parity the way the server checks them: odd moves need the initiator's
//! secret, even moves the joiner's, and before anyone joins an even move
//! must carry no secret at all. The mover's color plays no part, so a move
//! made after a pass is refused when its parity belongs to the other side.

use super::{
    Ack, ClientError, CreatedGame, JoinedGame, MoveLog, MoveSubmission, RemoteMove, ResultReport,
};
use crate::games::reversi::{Move, StoneCount};
use crate::{CapabilitySecret, GameId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

/// One stored game.
#[derive(Debug, Clone)]
struct StoredGame {
    initiator_secret: CapabilitySecret,
    joiner_secret: Option<CapabilitySecret>,
    moves: Vec<RemoteMove>,
    result: Option<StoneCount>,
}

impl StoredGame {
    /// Odd sequence numbers belong to the initiator, even ones to the joiner.
    /// A missing secret compares equal to an empty one.
    fn authorizes(&self, sequence: u32, secret: Option<&CapabilitySecret>) -> bool {
        let expected = if sequence % 2 == 1 {
            Some(&self.initiator_secret)
        } else {
            self.joiner_secret.as_ref()
        };
        raw(secret) == raw(expected)
    }
}

fn raw(secret: Option<&CapabilitySecret>) -> &str {
    secret.map(CapabilitySecret::expose).unwrap_or("")
}

/// Shared in-memory move log. Clones share the same games.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMoveLog {
    games: Arc<Mutex<HashMap<GameId, StoredGame>>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryMoveLog {
    /// Creates an empty log.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory move log");
        Self::default()
    }

    /// Makes every subsequent call fail as if the server were unreachable.
    #[instrument(skip(self))]
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// All moves recorded for a game, in sequence order.
    pub fn moves(&self, game_id: &GameId) -> Vec<RemoteMove> {
        self.lock()
            .ok()
            .and_then(|games| games.get(game_id).map(|g| g.moves.clone()))
            .unwrap_or_default()
    }

    /// The last reported result for a game.
    pub fn result(&self, game_id: &GameId) -> Option<StoneCount> {
        self.lock()
            .ok()
            .and_then(|games| games.get(game_id).and_then(|g| g.result))
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<GameId, StoredGame>>, ClientError> {
        self.games
            .lock()
            .map_err(|_| ClientError::new("Move log state poisoned"))
    }

    fn ensure_online(&self) -> Result<(), ClientError> {
        if self.offline.load(Ordering::SeqCst) {
            warn!("Move log offline");
            return Err(ClientError::new("Move log unreachable"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MoveLog for InMemoryMoveLog {
    #[instrument(skip(self))]
    async fn create_game(&self) -> Result<CreatedGame, ClientError> {
        self.ensure_online()?;
        let game_id = GameId::new(uuid::Uuid::new_v4().to_string());
        let secret = CapabilitySecret::new(uuid::Uuid::new_v4().to_string());

        self.lock()?.insert(
            game_id.clone(),
            StoredGame {
                initiator_secret: secret.clone(),
                joiner_secret: None,
                moves: Vec::new(),
                result: None,
            },
        );

        info!(game_id = %game_id, "Created game");
        Ok(CreatedGame { game_id, secret })
    }

    #[instrument(skip(self))]
    async fn join_game(&self, game_id: &GameId) -> Result<JoinedGame, ClientError> {
        self.ensure_online()?;
        let mut games = self.lock()?;

        let game = games
            .get_mut(game_id)
            .filter(|g| g.joiner_secret.is_none())
            .ok_or_else(|| {
                warn!(game_id = %game_id, "Join refused");
                ClientError::new("guest already joined or game not found")
            })?;

        let secret = CapabilitySecret::new(uuid::Uuid::new_v4().to_string());
        game.joiner_secret = Some(secret.clone());

        info!(game_id = %game_id, "Joiner registered");
        Ok(JoinedGame { secret })
    }

    #[instrument(skip(self), fields(game_id = %submission.game_id))]
    async fn submit_move(&self, submission: &MoveSubmission) -> Result<Ack, ClientError> {
        self.ensure_online()?;
        let mut games = self.lock()?;

        let Some(game) = games.get_mut(&submission.game_id) else {
            return Ok(Ack::rejected("game not found"));
        };
        let sequence = game.moves.len() as u32 + 1;
        if !game.authorizes(sequence, submission.secret.as_ref()) {
            warn!(sequence, color = %submission.color, "Invalid secret");
            return Ok(Ack::rejected("invalid secret"));
        }

        game.moves.push(RemoteMove::new(
            submission.game_id.clone(),
            Move::new(submission.position, submission.color),
            sequence,
        ));

        debug!(sequence, position = %submission.position, "Move recorded");
        Ok(Ack::accepted())
    }

    #[instrument(skip(self), fields(game_id = %report.game_id))]
    async fn report_result(&self, report: &ResultReport) -> Result<Ack, ClientError> {
        self.ensure_online()?;
        let mut games = self.lock()?;

        let Some(game) = games.get_mut(&report.game_id) else {
            return Ok(Ack::rejected("game not found"));
        };
        game.result = Some(report.count);

        info!(
            black = report.count.black,
            white = report.count.white,
            "Result recorded"
        );
        Ok(Ack::accepted())
    }

    #[instrument(skip(self))]
    async fn poll_moves(
        &self,
        game_id: &GameId,
        after: u32,
    ) -> Result<Vec<RemoteMove>, ClientError> {
        self.ensure_online()?;
        let games = self.lock()?;

        let moves: Vec<RemoteMove> = games
            .get(game_id)
            .map(|g| {
                g.moves
                    .iter()
                    .filter(|m| m.sequence > after)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        debug!(count = moves.len(), "Polled moves");
        Ok(moves)
    }
}
