use thiserror::Error;

/// Errors raised by remote transports.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server name did not resolve.
    #[error("Server not found: {server}")]
    UnknownHost { server: String },

    /// TCP connect or greeting failed.
    #[error("Connection to {server} failed: {reason}")]
    Connect { server: String, reason: String },

    /// Credentials were rejected.
    #[error("Login rejected for user {username}")]
    Auth { username: String },

    /// Remote file or directory does not exist.
    #[error("Remote path not found: {path}")]
    NotFound { path: String },

    /// A command on an established session failed.
    #[error("Transfer of {path} failed: {reason}")]
    Transfer { path: String, reason: String },

    /// Local I/O error (staging directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking worker running the session panicked or was cancelled.
    #[error("Transport task failed: {0}")]
    Task(String),
}

impl TransportError {
    /// Whether the source itself was unreachable or refused us.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Self::UnknownHost { .. } | Self::Connect { .. } | Self::Auth { .. }
        )
    }
}
