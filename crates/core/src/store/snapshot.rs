use thiserror::Error;

use super::traits::{keys, ConfigStore, StoreError};
use crate::transport::RemoteEndpoint;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings incomplete, missing: {}", .missing.join(", "))]
    Incomplete { missing: Vec<&'static str> },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Settings read once at the start of a cycle.
///
/// Edits made through the store while a cycle runs only apply to the next one.
#[derive(Debug, Clone)]
pub struct SettingsSnapshot {
    pub endpoint: RemoteEndpoint,
    pub targets: Vec<String>,
    pub interval_secs: u64,
}

impl SettingsSnapshot {
    pub fn load(store: &dyn ConfigStore) -> Result<Self, SettingsError> {
        let server = non_blank(store.get(keys::SERVER)?);
        let username = non_blank(store.get(keys::USERNAME)?);
        let password = non_blank(store.get(keys::PASSWORD)?);

        let (server, username, password) = match (server, username, password) {
            (Some(s), Some(u), Some(p)) => (s, u, p),
            (s, u, p) => {
                let missing = [(keys::SERVER, s), (keys::USERNAME, u), (keys::PASSWORD, p)]
                    .into_iter()
                    .filter(|(_, v)| v.is_none())
                    .map(|(k, _)| k)
                    .collect();
                return Err(SettingsError::Incomplete { missing });
            }
        };

        Ok(Self {
            endpoint: RemoteEndpoint {
                server,
                username,
                password,
            },
            targets: store.list_targets()?,
            interval_secs: store.interval_secs()?,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryConfigStore;

    #[test]
    fn test_load_complete() {
        let store =
            MemoryConfigStore::with_settings("ftp.local", "kitchen", "pw", &["Kitchen1", "Bar"]);
        store.set(keys::INTERVAL, "30").unwrap();

        let snapshot = SettingsSnapshot::load(&store).unwrap();
        assert_eq!(snapshot.endpoint.server, "ftp.local");
        assert_eq!(snapshot.endpoint.username, "kitchen");
        assert_eq!(snapshot.endpoint.password, "pw");
        assert_eq!(snapshot.targets, vec!["Kitchen1", "Bar"]);
        assert_eq!(snapshot.interval_secs, 30);
    }

    #[test]
    fn test_load_reports_missing_keys() {
        let store = MemoryConfigStore::new();
        store.set(keys::SERVER, "ftp.local").unwrap();

        let err = SettingsSnapshot::load(&store).unwrap_err();
        match err {
            SettingsError::Incomplete { missing } => {
                assert_eq!(missing, vec![keys::USERNAME, keys::PASSWORD]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let store = MemoryConfigStore::with_settings("  ", "kitchen", "pw", &[]);
        let err = SettingsSnapshot::load(&store).unwrap_err();
        assert_eq!(err.to_string(), "settings incomplete, missing: server");
    }
}
