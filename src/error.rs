use thiserror::Error;

/// Unified error type for git-relay operations
#[derive(Error, Debug)]
pub enum GitRelayError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Release context error: {0}")]
    Context(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Request creation failed: {0}")]
    Request(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-relay
pub type Result<T> = std::result::Result<T, GitRelayError>;

impl GitRelayError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitRelayError::Config(msg.into())
    }

    /// Create a release context error with context
    pub fn context(msg: impl Into<String>) -> Self {
        GitRelayError::Context(msg.into())
    }

    /// Create a remote operation error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        GitRelayError::Remote(msg.into())
    }

    /// Create a request creation error with context
    pub fn request(msg: impl Into<String>) -> Self {
        GitRelayError::Request(msg.into())
    }
}
