//! Error types for the coordination layer

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Errors that can escape an auth action. Expected failures (bad
/// credentials, network trouble, backend validation) arrive as values, never
/// as panics, and each carries wording fit to show a person.
#[derive(Error, Debug)]
pub enum CoordinationError {
    /// Authentication failed; the message is already user-facing.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The action needs an authenticated session and there is none.
    #[error("Unauthorized access")]
    Unauthorized,

    /// Error from the backend API
    #[error("Api error: {0}")]
    Api(ApiError),

    /// Error from the credential persistence layer
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoordinationError {
    /// Log the error and return self, allowing for method chaining and
    /// explicit logging when needed.
    pub fn log(self) -> Self {
        match &self {
            Self::Authentication(msg) => tracing::error!("Authentication error: {}", msg),
            Self::Unauthorized => tracing::error!("Unauthorized access"),
            Self::Api(err) => tracing::error!("Api error: {}", err),
            Self::Storage(msg) => tracing::error!("Storage error: {}", msg),
        }
        self
    }

    /// The message fit for direct display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication(msg) => msg.clone(),
            Self::Unauthorized => "You must be signed in to do that.".to_string(),
            Self::Api(err) => err.user_message(),
            Self::Storage(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

// Custom From implementations that automatically log errors

impl From<ApiError> for CoordinationError {
    fn from(err: ApiError) -> Self {
        let error = Self::Api(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<StorageError> for CoordinationError {
    fn from(err: StorageError) -> Self {
        let error = Self::Storage(err.to_string());
        tracing::error!("{}", error);
        error
    }
}
