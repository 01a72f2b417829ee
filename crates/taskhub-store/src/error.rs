use taskhub_core::AppError;
use thiserror::Error;

/// Errors from the hosted store collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    /// Presented access token was rejected by the auth provider
    #[error("invalid or expired token")]
    InvalidToken,

    /// Email/password pair was rejected
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Query matched no rows
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// Upstream returned an unexpected error status
    #[error("store error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Request never completed (connect, timeout, decode)
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidToken => Self::unauthorized("Invalid token"),
            StoreError::InvalidCredentials => Self::unauthorized("Invalid credentials"),
            StoreError::NotFound { resource } => Self::not_found(resource),
            other @ (StoreError::Upstream { .. } | StoreError::Transport(_)) => Self::internal(other.to_string()),
        }
    }
}
