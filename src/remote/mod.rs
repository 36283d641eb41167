//! Remote play: optimistic local moves reconciled with a polled move log.
//!
//! [`RemoteSession`] holds the pure transitions, [`RemoteController`] runs
//! them against a [`MoveLog`](crate::MoveLog) with a background poller.

mod controller;
mod peer;
mod poller;
mod sync;

pub use controller::RemoteController;
pub use peer::{PeerState, Role};
pub use poller::{PollHandle, PollTarget, PolledBatch};
pub use sync::{RemoteSession, SyncError, Transition};
