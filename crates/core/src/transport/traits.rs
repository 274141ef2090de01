//! Trait definitions for the transport module.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::error::TransportError;
use super::listing::order_listing;
use super::types::{RemoteEndpoint, RemoteItem};

/// A remote source of order documents.
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// Returns the name of this transport implementation.
    fn name(&self) -> &str;

    /// Raw file names in `directory`, in whatever order the source returns them.
    async fn list_names(
        &self,
        endpoint: &RemoteEndpoint,
        directory: &str,
    ) -> Result<Vec<String>, TransportError>;

    /// Download `filename` into `dest_dir`, returning the staged path.
    async fn fetch(
        &self,
        endpoint: &RemoteEndpoint,
        directory: &str,
        filename: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, TransportError>;

    /// Remove `filename` from the source.
    async fn delete(
        &self,
        endpoint: &RemoteEndpoint,
        directory: &str,
        filename: &str,
    ) -> Result<(), TransportError>;

    /// Documents named `<prefix>_<yyyyMMddHHmmss>.pdf`, oldest first.
    async fn list(
        &self,
        endpoint: &RemoteEndpoint,
        directory: &str,
        prefix: &str,
    ) -> Result<Vec<RemoteItem>, TransportError> {
        let names = self.list_names(endpoint, directory).await?;
        Ok(order_listing(names, prefix))
    }
}
