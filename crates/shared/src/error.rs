use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the backend on any non-2xx response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiError {
    /// The message text, if the server sent a non-blank one.
    pub fn message_text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

/// Client-side checks that block a request before it reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("page must be at least 1")]
    InvalidPage,
    #[error("item id must not be empty")]
    EmptyItemId,
    #[error("reply text must not be empty")]
    EmptyReply,
    #[error("a rejection reason is required")]
    EmptyRejectionReason,
    #[error("status must not be empty")]
    EmptyStatus,
}
