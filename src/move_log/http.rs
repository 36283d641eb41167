//! HTTP move log client (JSON over POST).

use super::wire::{
    EndGameRequest, JoinGameRequest, JoinGameResponse, PlaceStoneRequest, PollMovesRequest,
    PollMovesResponse, StartGameResponse, SuccessResponse,
};
use super::{
    Ack, ClientError, CreatedGame, JoinedGame, MoveLog, MoveSubmission, RemoteMove, ResultReport,
};
use crate::{CapabilitySecret, GameId};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Move log reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMoveLog {
    /// Base URL of the server, without trailing slash.
    base_url: String,
    /// HTTP client.
    client: reqwest::Client,
}

impl HttpMoveLog {
    /// Creates a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        info!("Created HTTP move log client");
        Ok(Self { base_url, client })
    }

    /// Returns the server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs a JSON body, returning status and raw response text.
    async fn post<B: Serialize + ?Sized>(
        &self,
        route: &str,
        body: &B,
    ) -> Result<(StatusCode, String), ClientError> {
        let url = format!("{}/{}", self.base_url, route);
        debug!(url = %url, "Sending request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, url = %url, "Request failed");
                ClientError::new(format!("HTTP request failed: {}", e))
            })?;

        let status = response.status();
        let text = response.text().await?;
        debug!(status = %status, body = %text, "Received response");
        Ok((status, text))
    }
}

/// Decodes a success body, or turns an error status into a `ClientError`
/// carrying the server's message.
fn decode<R: DeserializeOwned>(status: StatusCode, text: &str) -> Result<R, ClientError> {
    if !status.is_success() {
        return Err(ClientError::new(server_message(status, text)));
    }
    Ok(serde_json::from_str(text)?)
}

/// Converts a `{success, message}` body into an acknowledgement.
fn ack(status: StatusCode, text: &str) -> Result<Ack, ClientError> {
    match serde_json::from_str::<SuccessResponse>(text) {
        Ok(body) if body.success && status.is_success() => Ok(Ack {
            accepted: true,
            message: body.message,
        }),
        Ok(_) => Ok(Ack::rejected(server_message(status, text))),
        Err(e) if status.is_success() => Err(e.into()),
        Err(_) => Ok(Ack::rejected(server_message(status, text))),
    }
}

fn server_message(status: StatusCode, text: &str) -> String {
    serde_json::from_str::<SuccessResponse>(text)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| format!("HTTP {}", status))
}

#[async_trait::async_trait]
impl MoveLog for HttpMoveLog {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn create_game(&self) -> Result<CreatedGame, ClientError> {
        let (status, text) = self.post("start-game", &serde_json::json!({})).await?;
        let body: StartGameResponse = decode(status, &text)?;
        info!(game_id = %body.play_id, "Game created");
        Ok(CreatedGame {
            game_id: GameId::new(body.play_id),
            secret: CapabilitySecret::new(body.host_secret),
        })
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn join_game(&self, game_id: &GameId) -> Result<JoinedGame, ClientError> {
        let request = JoinGameRequest::new(game_id.as_str());
        let (status, text) = self.post("join-game", &request).await?;
        let body: JoinGameResponse = decode(status, &text).inspect_err(|e| {
            warn!(error = %e, "Join rejected");
        })?;
        info!("Joined game");
        Ok(JoinedGame {
            secret: CapabilitySecret::new(body.guest_secret),
        })
    }

    #[instrument(skip(self), fields(game_id = %submission.game_id))]
    async fn submit_move(&self, submission: &MoveSubmission) -> Result<Ack, ClientError> {
        let request = PlaceStoneRequest::new(
            submission.game_id.as_str(),
            submission.color,
            submission.position.col(),
            submission.position.row(),
            submission.secret.as_ref().map(CapabilitySecret::expose),
        );
        let (status, text) = self.post("place-stone", &request).await?;
        ack(status, &text)
    }

    #[instrument(skip(self), fields(game_id = %report.game_id))]
    async fn report_result(&self, report: &ResultReport) -> Result<Ack, ClientError> {
        let request = EndGameRequest::new(
            report.game_id.as_str(),
            report.count.black,
            report.count.white,
        );
        let (status, text) = self.post("end-game", &request).await?;
        ack(status, &text)
    }

    #[instrument(skip(self))]
    async fn poll_moves(
        &self,
        game_id: &GameId,
        after: u32,
    ) -> Result<Vec<RemoteMove>, ClientError> {
        let request = PollMovesRequest::new(game_id.as_str(), after);
        let (status, text) = self.post("poll-moves", &request).await?;
        let body: PollMovesResponse = decode(status, &text)?;

        let mut moves: Vec<RemoteMove> = body
            .moves
            .unwrap_or_default()
            .into_iter()
            .map(|m| RemoteMove {
                game_id: GameId::new(m.play_id),
                color: m.color,
                row: m.row,
                col: m.col,
                sequence: m.move_order,
            })
            .collect();
        moves.sort_by_key(|m| m.sequence);

        debug!(count = moves.len(), "Polled moves");
        Ok(moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_uses_server_message() {
        let err = decode::<JoinGameResponse>(
            StatusCode::CONFLICT,
            r#"{"success":false,"message":"guest already joined or game not found"}"#,
        )
        .unwrap_err();
        assert_eq!(err.message, "guest already joined or game not found");
    }

    #[test]
    fn test_error_status_without_body() {
        let err = decode::<JoinGameResponse>(StatusCode::BAD_GATEWAY, "").unwrap_err();
        assert_eq!(err.message, "HTTP 502 Bad Gateway");
    }

    #[test]
    fn test_ack_maps_rejection() {
        let ack = ack(
            StatusCode::FORBIDDEN,
            r#"{"success":false,"message":"invalid secret"}"#,
        )
        .unwrap();
        assert_eq!(ack, Ack::rejected("invalid secret"));

        let ok = super::ack(StatusCode::OK, r#"{"success":true}"#).unwrap();
        assert!(ok.accepted);
    }

    #[test]
    fn test_poll_body_accepts_null_moves() {
        let body: PollMovesResponse = serde_json::from_str(r#"{"moves":null}"#).unwrap();
        assert!(body.moves.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let log = HttpMoveLog::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(log.base_url(), "http://localhost:8080");
    }
}
