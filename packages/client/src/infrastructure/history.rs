//! HTTP implementation of [`HistoryApi`].

use async_trait::async_trait;

use crate::{
    domain::{HistoryApi, HistoryEntry, UserId},
    error::HistoryError,
    infrastructure::dto::http::HistoryEntryDto,
};

/// Fetches conversation history from `GET /chat-history`
#[derive(Debug, Clone)]
pub struct HttpHistoryApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpHistoryApi {
    /// Create a client for the API at `base_url` (e.g. `http://localhost:8080`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl HistoryApi for HttpHistoryApi {
    async fn fetch_history(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
    ) -> Result<Vec<HistoryEntry>, HistoryError> {
        let url = format!("{}/chat-history", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[("senderId", sender_id), ("receiverId", receiver_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HistoryError::Status(status.as_u16()));
        }

        // The server encodes an empty history as `null`
        let entries: Option<Vec<HistoryEntryDto>> = response.json().await?;
        tracing::debug!(
            "Loaded {} history entries for {} <-> {}",
            entries.as_ref().map_or(0, Vec::len),
            sender_id,
            receiver_id
        );

        Ok(entries
            .unwrap_or_default()
            .into_iter()
            .map(HistoryEntry::from)
            .collect())
    }
}
