//! Local drop-folder transport.
//!
//! Treats a directory on this machine as the remote source. The endpoint is
//! ignored; remote directories are resolved under `root`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::error::TransportError;
use super::traits::RemoteTransport;
use super::types::{remote_path, RemoteEndpoint};

pub struct LocalDirTransport {
    root: PathBuf,
}

impl LocalDirTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, directory: &str) -> PathBuf {
        self.root.join(directory.trim_start_matches('/'))
    }

    fn map_io(path: String, e: std::io::Error) -> TransportError {
        if e.kind() == ErrorKind::NotFound {
            TransportError::NotFound { path }
        } else {
            TransportError::Io(e)
        }
    }
}

#[async_trait]
impl RemoteTransport for LocalDirTransport {
    fn name(&self) -> &str {
        "local"
    }

    async fn list_names(
        &self,
        _endpoint: &RemoteEndpoint,
        directory: &str,
    ) -> Result<Vec<String>, TransportError> {
        let dir = self.resolve(directory);
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| Self::map_io(directory.to_string(), e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        Ok(names)
    }

    async fn fetch(
        &self,
        _endpoint: &RemoteEndpoint,
        directory: &str,
        filename: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, TransportError> {
        let source = self.resolve(directory).join(filename);
        let dest = dest_dir.join(filename);
        tokio::fs::copy(&source, &dest)
            .await
            .map_err(|e| Self::map_io(remote_path(directory, filename), e))?;
        Ok(dest)
    }

    async fn delete(
        &self,
        _endpoint: &RemoteEndpoint,
        directory: &str,
        filename: &str,
    ) -> Result<(), TransportError> {
        let path = self.resolve(directory).join(filename);
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| Self::map_io(remote_path(directory, filename), e))
    }
}
