//! JSON bodies exchanged with the HTTP move log.

use crate::games::reversi::Color;
use derive_new::new;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(super) struct StartGameResponse {
    pub play_id: String,
    pub host_secret: String,
}

#[derive(Debug, Serialize, new)]
pub(super) struct JoinGameRequest<'a> {
    pub play_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct JoinGameResponse {
    pub guest_secret: String,
}

#[derive(Debug, Serialize, new)]
pub(super) struct PlaceStoneRequest<'a> {
    pub play_id: &'a str,
    pub color: Color,
    pub col: u8,
    pub row: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<&'a str>,
}

#[derive(Debug, Serialize, new)]
pub(super) struct EndGameRequest<'a> {
    pub play_id: &'a str,
    pub black_count: u8,
    pub white_count: u8,
}

#[derive(Debug, Serialize, new)]
pub(super) struct PollMovesRequest<'a> {
    pub play_id: &'a str,
    pub after_move_order: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct PollMovesResponse {
    /// Go servers encode an empty slice as `null`.
    #[serde(default)]
    pub moves: Option<Vec<WireMove>>,
}

/// One stored move. Extra server columns (`id`, `created_at`) are ignored.
#[derive(Debug, Deserialize)]
pub(super) struct WireMove {
    pub play_id: String,
    pub color: Color,
    pub col: i32,
    pub row: i32,
    pub move_order: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct SuccessResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
