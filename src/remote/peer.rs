//! Per-side state for remote play.

use crate::CapabilitySecret;
use crate::games::reversi::{Color, GameState};
use serde::{Deserialize, Serialize};

/// Which side of a remote game this process plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Created the game; plays black.
    Initiator,
    /// Joined by id; plays white.
    Joiner,
}

impl Role {
    /// The color this role plays.
    pub fn color(self) -> Color {
        match self {
            Role::Initiator => Color::Black,
            Role::Joiner => Color::White,
        }
    }
}

/// Local view of this side's participation in a remote game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerState {
    role: Role,
    my_color: Color,
    secret: CapabilitySecret,
    cursor: u32,
    waiting_for_opponent: bool,
    is_my_turn: bool,
}

impl PeerState {
    /// State right after creating a game: black, on turn, opponent not yet seen.
    pub fn initiator(secret: CapabilitySecret) -> Self {
        Self {
            role: Role::Initiator,
            my_color: Role::Initiator.color(),
            secret,
            cursor: 0,
            waiting_for_opponent: true,
            is_my_turn: true,
        }
    }

    /// State right after joining: white, waiting for black's first move.
    pub fn joiner(secret: CapabilitySecret) -> Self {
        Self {
            role: Role::Joiner,
            my_color: Role::Joiner.color(),
            secret,
            cursor: 0,
            waiting_for_opponent: false,
            is_my_turn: false,
        }
    }

    /// Returns the role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the color this side plays.
    pub fn my_color(&self) -> Color {
        self.my_color
    }

    /// Returns the capability secret.
    pub fn secret(&self) -> &CapabilitySecret {
        &self.secret
    }

    /// Highest log sequence number already applied locally.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// True until any move from the log has been observed (initiator only).
    pub fn waiting_for_opponent(&self) -> bool {
        self.waiting_for_opponent
    }

    /// Whether this side may submit a move now.
    pub fn is_my_turn(&self) -> bool {
        self.is_my_turn
    }

    /// Moves the cursor forward. Never moves it back.
    pub(crate) fn advance_cursor(&mut self, sequence: u32) {
        self.cursor = self.cursor.max(sequence);
    }

    /// Records that the opponent's presence has been observed.
    pub(crate) fn opponent_seen(&mut self) {
        self.waiting_for_opponent = false;
    }

    /// Re-derives `is_my_turn` from the game.
    pub(crate) fn sync_turn(&mut self, game: &GameState) {
        self.is_my_turn = !game.is_game_over() && game.current_player() == self.my_color;
    }
}
