use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::traits::{keys, ConfigStore, StoreError, DEFAULT_INTERVAL_SECS};
use super::SecretCipher;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS configuration (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS printers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );
"#;

/// SQLite-backed settings store
pub struct SqliteConfigStore {
    conn: Mutex<Connection>,
    cipher: SecretCipher,
}

impl SqliteConfigStore {
    /// Open (or create) the settings database at `path`
    pub fn new(path: &Path, cipher: SecretCipher) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn, cipher)
    }

    /// Create an in-memory store (useful for testing)
    pub fn in_memory(cipher: SecretCipher) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, cipher)
    }

    fn init(conn: Connection, cipher: SecretCipher) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        conn.execute(
            "INSERT OR IGNORE INTO configuration (name, value) VALUES (?1, ?2)",
            params![keys::INTERVAL, DEFAULT_INTERVAL_SECS.to_string()],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            cipher,
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".to_string()))
    }

    fn is_secret(key: &str) -> bool {
        keys::SECRETS.contains(&key)
    }

    fn read_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM configuration WHERE name = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

impl ConfigStore for SqliteConfigStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if key.is_empty() {
            return Ok(None);
        }

        let Some(value) = self.read_raw(key)? else {
            return Ok(None);
        };

        if !Self::is_secret(key) {
            return Ok(Some(value));
        }

        match self.cipher.decrypt(&value) {
            Ok(plain) => Ok(Some(plain)),
            Err(e) => {
                tracing::warn!("Stored {} could not be decrypted: {}", key, e);
                Ok(None)
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if key.is_empty() || value.is_empty() {
            return Ok(());
        }

        let stored = if Self::is_secret(key) {
            self.cipher.encrypt(value)?
        } else {
            value.to_string()
        };

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO configuration (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
            params![key, stored],
        )?;
        Ok(())
    }

    fn list_targets(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name FROM printers ORDER BY id")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn set_targets(&self, targets: &[String]) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM printers", [])?;
        for name in targets.iter().filter(|n| !n.trim().is_empty()) {
            tx.execute(
                "INSERT OR IGNORE INTO printers (name) VALUES (?1)",
                params![name],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn clear_targets(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM printers", [])?;
        Ok(())
    }
}
