//! Chat-history collaborator interface.
//!
//! The concrete HTTP implementation lives in `infrastructure::history`.

use async_trait::async_trait;

use super::model::{HistoryEntry, UserId};
use crate::error::HistoryError;

/// Point-in-time lookup of a private conversation's history.
///
/// A single request and a single response; callers never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryApi: Send + Sync {
    /// Fetch the messages exchanged between `sender_id` and `receiver_id`, oldest first
    async fn fetch_history(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
    ) -> Result<Vec<HistoryEntry>, HistoryError>;
}
