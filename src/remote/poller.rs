//! Background polling of the move log.

use crate::GameId;
use crate::move_log::{MoveLog, RemoteMove};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

/// What the poller should ask for. `None` on the channel pauses polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTarget {
    /// Game to poll.
    pub game_id: GameId,
    /// Highest sequence number already applied.
    pub after: u32,
}

/// Moves returned by one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolledBatch {
    /// Game the poll was for.
    pub game_id: GameId,
    /// Cursor the poll was issued with.
    pub after: u32,
    /// Moves with a sequence number above `after`.
    pub moves: Vec<RemoteMove>,
}

/// Owns the polling task. Dropping the handle stops it.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Spawns a task that polls every `period` while `target` holds a value,
    /// forwarding non-empty batches. Must be called inside a tokio runtime.
    #[instrument(skip(log, target))]
    pub fn spawn(
        log: Arc<dyn MoveLog>,
        period: Duration,
        target: watch::Receiver<Option<PollTarget>>,
    ) -> (Self, mpsc::UnboundedReceiver<PolledBatch>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(log, period, target, tx));
        info!("Poller started");
        (Self { task }, rx)
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        debug!("Stopping poller");
        self.task.abort();
    }
}

async fn run(
    log: Arc<dyn MoveLog>,
    period: Duration,
    target: watch::Receiver<Option<PollTarget>>,
    tx: mpsc::UnboundedSender<PolledBatch>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if tx.is_closed() || target.has_changed().is_err() {
            break;
        }

        let current = Option::clone(&target.borrow());
        let Some(PollTarget { game_id, after }) = current else {
            continue;
        };

        match log.poll_moves(&game_id, after).await {
            Ok(moves) if moves.is_empty() => {}
            Ok(moves) => {
                debug!(game_id = %game_id, after, count = moves.len(), "Forwarding batch");
                if tx
                    .send(PolledBatch {
                        game_id,
                        after,
                        moves,
                    })
                    .is_err()
                {
                    break;
                }
            }
            Err(e) => warn!(game_id = %game_id, error = %e, "Poll failed, retrying next tick"),
        }
    }
    debug!("Poller stopped");
}
