use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Json conversion(Serde) error: {0}")]
    Serde(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ApiError {
    /// The message fit to show a person: the backend's own wording where it
    /// provided one, a generic fallback where it did not.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => {
                "Unable to reach the booking service. Please try again.".to_string()
            }
            ApiError::Backend { message, .. } => message.clone(),
            ApiError::Unauthorized(message) => message.clone(),
            ApiError::Serde(_) => {
                "Unexpected response from the booking service.".to_string()
            }
            ApiError::Config(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "Transport error: connection refused");

        let err = ApiError::Backend {
            status: 422,
            message: "Email already taken".to_string(),
        };
        assert_eq!(err.to_string(), "Backend error (422): Email already taken");

        let err = ApiError::Unauthorized("Invalid credentials".to_string());
        assert_eq!(err.to_string(), "Unauthorized: Invalid credentials");
    }

    #[test]
    fn test_user_message_prefers_backend_wording() {
        let err = ApiError::Backend {
            status: 422,
            message: "Email already taken".to_string(),
        };
        assert_eq!(err.user_message(), "Email already taken");
    }

    #[test]
    fn test_user_message_generic_for_transport() {
        let err = ApiError::Transport("dns failure".to_string());
        assert!(!err.user_message().contains("dns"));
    }

    #[test]
    fn test_error_is_sync_and_send() {
        fn assert_sync_send<T: Sync + Send>() {}
        assert_sync_send::<ApiError>();
    }
}
