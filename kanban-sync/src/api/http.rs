//! HTTP client for the board server API.

use super::BoardApi;
use crate::config::ClientConfig;
use crate::error::{KanbanError, Result};
use crate::types::{
    Board, BoardDirectory, BoardId, BoardSummary, Card, CardId, Column, ColumnId, ColumnPatch,
    NewCard, NewColumn,
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

/// Extract a human-readable message from a JSON error body.
///
/// Tries `detail`, then `message`, then falls back to the raw body.
fn extract_error_description(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = json.get("detail").and_then(|v| v.as_str()) {
            return detail.to_string();
        }
        if let Some(msg) = json.get("message").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
    }
    body.to_string()
}

/// [`BoardApi`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpBoardApi {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpBoardApi {
    /// Create an unauthenticated client rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    /// Create a client from configuration (base URL, token, timeout)
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Authenticate every request with a JWT
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "dispatching request");
        let builder = self.client.request(method, url);
        match &self.auth_token {
            Some(token) => builder.header("Authorization", format!("JWT {}", token)),
            None => builder,
        }
    }

    /// Map a non-success response to `KanbanError::Api`
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(KanbanError::Api {
            status: status.as_u16(),
            body: extract_error_description(&body),
        })
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let response = Self::check_response(builder.send().await?).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send and discard the response body
    async fn send_empty(builder: RequestBuilder) -> Result<()> {
        Self::check_response(builder.send().await?).await?;
        Ok(())
    }

    fn with_body<B: Serialize + ?Sized>(builder: RequestBuilder, body: &B) -> RequestBuilder {
        builder.json(body)
    }
}

#[async_trait]
impl BoardApi for HttpBoardApi {
    async fn list_boards(&self) -> Result<BoardDirectory> {
        Self::send_json(self.request(Method::GET, "/api/boards/")).await
    }

    async fn fetch_board(&self, id: BoardId) -> Result<Board> {
        let mut board: Board =
            Self::send_json(self.request(Method::GET, &format!("/api/boards/{}/", id))).await?;
        board.id = id;
        Ok(board)
    }

    async fn create_board(&self, name: &str) -> Result<BoardSummary> {
        let builder = Self::with_body(
            self.request(Method::POST, "/api/boards/"),
            &json!({ "name": name }),
        );
        Self::send_json(builder).await
    }

    async fn create_card(&self, card: &NewCard) -> Result<Card> {
        let builder = Self::with_body(self.request(Method::POST, "/api/cards/"), card);
        Self::send_json(builder).await
    }

    async fn update_cards(&self, cards: &[Card]) -> Result<()> {
        let builder = Self::with_body(
            self.request(Method::PATCH, "/api/cards/"),
            &json!({ "cards": cards }),
        );
        Self::send_empty(builder).await
    }

    async fn update_card(&self, card: &Card) -> Result<()> {
        let builder = Self::with_body(
            self.request(Method::PATCH, &format!("/api/cards/{}/", card.id)),
            card,
        );
        Self::send_empty(builder).await
    }

    async fn delete_card(&self, id: CardId) -> Result<()> {
        Self::send_empty(self.request(Method::DELETE, &format!("/api/cards/{}/", id))).await
    }

    async fn create_column(&self, column: &NewColumn) -> Result<Column> {
        let builder = Self::with_body(self.request(Method::POST, "/api/columns/"), column);
        Self::send_json(builder).await
    }

    async fn update_columns(&self, columns: &[ColumnPatch]) -> Result<()> {
        let builder = Self::with_body(
            self.request(Method::PATCH, "/api/columns/"),
            &json!({ "columns": columns }),
        );
        Self::send_empty(builder).await
    }

    async fn update_column(&self, column: &ColumnPatch) -> Result<()> {
        let builder = Self::with_body(
            self.request(Method::PATCH, &format!("/api/columns/{}/", column.id)),
            column,
        );
        Self::send_empty(builder).await
    }

    async fn delete_column(&self, id: ColumnId) -> Result<()> {
        Self::send_empty(self.request(Method::DELETE, &format!("/api/columns/{}/", id))).await
    }
}
