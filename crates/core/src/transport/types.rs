use chrono::NaiveDateTime;
use serde::Serialize;

/// Where and as whom to connect. Supplied on every call.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    /// `host` or `host:port`
    pub server: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for RemoteEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteEndpoint")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A listed document and its ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteItem {
    pub name: String,
    /// Timestamp embedded in the name, `None` when the digits are not a valid date.
    pub timestamp: Option<NaiveDateTime>,
}

/// Join a remote directory and a file name with exactly one separator.
pub fn remote_path(directory: &str, filename: &str) -> String {
    if directory.is_empty() {
        filename.to_string()
    } else if directory.ends_with('/') {
        format!("{}{}", directory, filename)
    } else {
        format!("{}/{}", directory, filename)
    }
}
