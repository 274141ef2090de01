use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::traits::{keys, ConfigStore, StoreError, DEFAULT_INTERVAL_SECS};

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<String, String>,
    targets: Vec<String>,
}

/// In-process settings store without persistence.
///
/// Secrets are kept in plain memory; use [`super::SqliteConfigStore`] when
/// values must survive a restart.
#[derive(Debug)]
pub struct MemoryConfigStore {
    inner: Mutex<Inner>,
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        let mut values = HashMap::new();
        values.insert(keys::INTERVAL.to_string(), DEFAULT_INTERVAL_SECS.to_string());
        Self {
            inner: Mutex::new(Inner {
                values,
                targets: Vec::new(),
            }),
        }
    }

    /// Store pre-filled with complete connection settings.
    pub fn with_settings(server: &str, username: &str, password: &str, targets: &[&str]) -> Self {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.lock() {
            inner
                .values
                .insert(keys::SERVER.to_string(), server.to_string());
            inner
                .values
                .insert(keys::USERNAME.to_string(), username.to_string());
            inner
                .values
                .insert(keys::PASSWORD.to_string(), password.to_string());
            inner.targets = targets.iter().map(|t| t.to_string()).collect();
        }
        store
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Database("store lock poisoned".to_string()))
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if key.is_empty() || value.is_empty() {
            return Ok(());
        }
        self.lock()?
            .values
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn list_targets(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.targets.clone())
    }

    fn set_targets(&self, targets: &[String]) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.targets.clear();
        for name in targets.iter().filter(|n| !n.trim().is_empty()) {
            if !inner.targets.contains(name) {
                inner.targets.push(name.clone());
            }
        }
        Ok(())
    }

    fn clear_targets(&self) -> Result<(), StoreError> {
        self.lock()?.targets.clear();
        Ok(())
    }
}
