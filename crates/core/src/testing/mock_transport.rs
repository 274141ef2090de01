//! Mock remote transport for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::journal::CallJournal;
use crate::transport::{remote_path, RemoteEndpoint, RemoteTransport, TransportError};

/// A call made against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    List { server: String, directory: String },
    Fetch { name: String },
    Delete { name: String },
}

/// In-memory remote directory.
///
/// Files are listed in insertion order, which lets tests feed an unsorted
/// listing. Fetch writes the stored bytes into the destination directory and
/// delete removes the file from the mock.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    files: Arc<RwLock<Vec<(String, Vec<u8>)>>>,
    calls: Arc<RwLock<Vec<TransportCall>>>,
    failing_fetches: Arc<RwLock<HashSet<String>>>,
    failing_deletes: Arc<RwLock<HashSet<String>>>,
    next_list_error: Arc<RwLock<Option<TransportError>>>,
    journal: Option<CallJournal>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record calls into a journal shared with other mocks.
    pub fn with_journal(mut self, journal: CallJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Put a file into the remote directory.
    pub async fn add_file(&self, name: &str, bytes: &[u8]) {
        self.files
            .write()
            .await
            .push((name.to_string(), bytes.to_vec()));
    }

    /// Put several files, each containing its own name as bytes.
    pub async fn add_files(&self, names: &[&str]) {
        for name in names {
            self.add_file(name, name.as_bytes()).await;
        }
    }

    /// Make every fetch of `name` fail.
    pub async fn fail_fetch(&self, name: &str) {
        self.failing_fetches.write().await.insert(name.to_string());
    }

    /// Make every delete of `name` fail.
    pub async fn fail_delete(&self, name: &str) {
        self.failing_deletes.write().await.insert(name.to_string());
    }

    /// The next listing fails with `error`.
    pub async fn set_next_list_error(&self, error: TransportError) {
        *self.next_list_error.write().await = Some(error);
    }

    pub async fn calls(&self) -> Vec<TransportCall> {
        self.calls.read().await.clone()
    }

    pub async fn fetched(&self) -> Vec<String> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|c| match c {
                TransportCall::Fetch { name } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn deleted(&self) -> Vec<String> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|c| match c {
                TransportCall::Delete { name } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Names still present in the remote directory.
    pub async fn remaining(&self) -> Vec<String> {
        self.files
            .read()
            .await
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    async fn record(&self, call: TransportCall, entry: String) {
        self.calls.write().await.push(call);
        if let Some(journal) = &self.journal {
            journal.record(entry).await;
        }
    }
}

#[async_trait]
impl RemoteTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_names(
        &self,
        endpoint: &RemoteEndpoint,
        directory: &str,
    ) -> Result<Vec<String>, TransportError> {
        self.record(
            TransportCall::List {
                server: endpoint.server.clone(),
                directory: directory.to_string(),
            },
            "list".to_string(),
        )
        .await;

        if let Some(error) = self.next_list_error.write().await.take() {
            return Err(error);
        }
        Ok(self.remaining().await)
    }

    async fn fetch(
        &self,
        _endpoint: &RemoteEndpoint,
        directory: &str,
        filename: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, TransportError> {
        self.record(
            TransportCall::Fetch {
                name: filename.to_string(),
            },
            format!("fetch:{}", filename),
        )
        .await;

        if self.failing_fetches.read().await.contains(filename) {
            return Err(TransportError::Transfer {
                path: remote_path(directory, filename),
                reason: "simulated fetch failure".to_string(),
            });
        }

        let bytes = self
            .files
            .read()
            .await
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| TransportError::NotFound {
                path: remote_path(directory, filename),
            })?;

        let dest = dest_dir.join(filename);
        tokio::fs::write(&dest, bytes).await?;
        Ok(dest)
    }

    async fn delete(
        &self,
        _endpoint: &RemoteEndpoint,
        directory: &str,
        filename: &str,
    ) -> Result<(), TransportError> {
        self.record(
            TransportCall::Delete {
                name: filename.to_string(),
            },
            format!("delete:{}", filename),
        )
        .await;

        if self.failing_deletes.read().await.contains(filename) {
            return Err(TransportError::Transfer {
                path: remote_path(directory, filename),
                reason: "simulated delete failure".to_string(),
            });
        }

        let mut files = self.files.write().await;
        match files.iter().position(|(name, _)| name == filename) {
            Some(index) => {
                files.remove(index);
                Ok(())
            }
            None => Err(TransportError::NotFound {
                path: remote_path(directory, filename),
            }),
        }
    }
}
