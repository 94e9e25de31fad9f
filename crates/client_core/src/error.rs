use shared::error::ValidationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error(
        "request failed with status {status}: {}",
        .message.as_deref().unwrap_or("no message")
    )]
    Status { status: u16, message: Option<String> },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ListError {
    /// Text for the error banner or alert. Server and validation messages are
    /// shown verbatim; anything else collapses to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Status { message: None, .. } | Self::Transport(_) | Self::Decode(_) => {
                fallback.to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ListError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
