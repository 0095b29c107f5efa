use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}
