//! Failure taxonomy shared by every remote operation.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Failure {
    /// 401 from the backend; the credential has already been cleared.
    #[error("unauthorized")]
    Auth,
    /// Network error, non-success status or an unparseable body.
    #[error("transport error: {0}")]
    Transport(String),
    /// The endpoint answered with a structured `{error}` payload.
    #[error("{0}")]
    Content(String),
}

impl Failure {
    pub fn is_auth(&self) -> bool {
        matches!(self, Failure::Auth)
    }
}

impl From<reqwest::Error> for Failure {
    fn from(e: reqwest::Error) -> Self {
        Failure::Transport(e.to_string())
    }
}

impl From<std::io::Error> for Failure {
    fn from(e: std::io::Error) -> Self {
        Failure::Transport(e.to_string())
    }
}
