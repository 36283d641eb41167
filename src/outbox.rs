//! Ordered, fire-and-forget delivery of side effects to the move log.
//!
//! Controllers never await the log when a move is made. They queue
//! [`Effect`]s here and a single background task sends them one at a
//! time, so two moves queued back to back reach the log in that order.

use crate::games::reversi::{GameState, Move};
use crate::move_log::{MoveLog, MoveSubmission, ResultReport};
use crate::{CapabilitySecret, GameId};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

/// Network side effect produced by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a move to the log.
    SubmitMove(MoveSubmission),
    /// Record the final score.
    ReportResult(ResultReport),
}

impl Effect {
    /// Effects for a move that produced `next`: the submission, plus the
    /// result when `next` is terminal.
    pub fn for_move(
        game_id: &GameId,
        mv: Move,
        secret: Option<CapabilitySecret>,
        next: &GameState,
    ) -> Vec<Effect> {
        let mut effects = vec![Effect::SubmitMove(MoveSubmission::new(
            game_id.clone(),
            mv.color,
            mv.position,
            secret,
        ))];
        if next.is_game_over() {
            effects.push(Effect::report(game_id, next));
        }
        effects
    }

    /// Result report for a finished game.
    pub fn report(game_id: &GameId, game: &GameState) -> Effect {
        Effect::ReportResult(ResultReport::new(game_id.clone(), game.count()))
    }
}

#[derive(Debug)]
enum Job {
    Deliver(Effect),
    Flush(oneshot::Sender<()>),
}

/// Handle to the delivery task. Clones feed the same queue.
///
/// The task ends once every handle is dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<Job>,
}

impl Outbox {
    /// Spawns the delivery task. Must be called inside a tokio runtime.
    #[instrument(skip(log))]
    pub fn spawn(log: Arc<dyn MoveLog>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(log, rx));
        info!("Outbox started");
        Self { tx }
    }

    /// Queues effects for delivery in order.
    pub fn dispatch(&self, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            debug!(?effect, "Queueing effect");
            if self.tx.send(Job::Deliver(effect)).is_err() {
                warn!("Outbox task gone, effect dropped");
            }
        }
    }

    /// Waits until everything queued before this call has been attempted.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Job::Flush(done)).is_err() {
            return;
        }
        let _ = wait.await;
    }
}

async fn run(log: Arc<dyn MoveLog>, mut rx: mpsc::UnboundedReceiver<Job>) {
    while let Some(job) = rx.recv().await {
        match job {
            Job::Deliver(effect) => deliver(log.as_ref(), effect).await,
            Job::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Outbox drained");
}

async fn deliver(log: &dyn MoveLog, effect: Effect) {
    let (what, game_id, result) = match &effect {
        Effect::SubmitMove(submission) => (
            "move",
            &submission.game_id,
            log.submit_move(submission).await,
        ),
        Effect::ReportResult(report) => {
            ("result", &report.game_id, log.report_result(report).await)
        }
    };

    match result {
        Ok(ack) if ack.accepted => debug!(what, game_id = %game_id, "Delivered"),
        Ok(ack) => warn!(
            what,
            game_id = %game_id,
            message = ?ack.message,
            "Move log did not accept"
        ),
        Err(e) => warn!(what, game_id = %game_id, error = %e, "Delivery failed"),
    }
}
