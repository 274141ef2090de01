//! Runtime settings store.
//!
//! Holds the values an operator edits while the daemon runs: remote server,
//! credentials, polling interval and the list of target printers. The
//! password is encrypted at rest and handed out decrypted.

mod cipher;
mod memory;
mod snapshot;
mod sqlite;
mod traits;

pub use cipher::{CipherError, SecretCipher};
pub use memory::MemoryConfigStore;
pub use snapshot::{SettingsError, SettingsSnapshot};
pub use sqlite::SqliteConfigStore;
pub use traits::{keys, ConfigStore, StoreError, DEFAULT_INTERVAL_SECS};
