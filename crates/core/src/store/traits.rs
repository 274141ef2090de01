use thiserror::Error;

use super::CipherError;

/// Polling interval used when none is stored.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Setting names understood by the pipeline.
pub mod keys {
    pub const SERVER: &str = "server";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const INTERVAL: &str = "interval";

    /// Values encrypted at rest.
    pub const SECRETS: &[&str] = &[PASSWORD];
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Encryption error: {0}")]
    Cipher(#[from] CipherError),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Key/value settings plus the ordered list of target printers.
pub trait ConfigStore: Send + Sync {
    /// Get a setting. Secrets are returned decrypted.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or replace a setting. Empty values are ignored.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Configured printer names, in the order they were saved.
    fn list_targets(&self) -> Result<Vec<String>, StoreError>;

    /// Replace the whole printer list.
    fn set_targets(&self, targets: &[String]) -> Result<(), StoreError>;

    fn clear_targets(&self) -> Result<(), StoreError>;

    /// Stored polling interval, falling back to [`DEFAULT_INTERVAL_SECS`] when
    /// absent or not a positive integer.
    fn interval_secs(&self) -> Result<u64, StoreError> {
        let Some(raw) = self.get(keys::INTERVAL)? else {
            return Ok(DEFAULT_INTERVAL_SECS);
        };
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => {
                tracing::warn!(
                    "Invalid stored interval {:?}, using {}s",
                    raw,
                    DEFAULT_INTERVAL_SECS
                );
                Ok(DEFAULT_INTERVAL_SECS)
            }
        }
    }
}
