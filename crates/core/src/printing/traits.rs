use async_trait::async_trait;

use super::error::PrintError;
use super::types::Document;

/// A print system with named output devices.
#[async_trait]
pub trait PrintSink: Send + Sync {
    /// Returns the name of this sink implementation.
    fn name(&self) -> &str;

    /// Names of the devices currently available. Queried fresh on every call.
    async fn list_devices(&self) -> Result<Vec<String>, PrintError>;

    /// Submit `document` to the device named exactly `device`.
    async fn submit(&self, document: &Document, device: &str) -> Result<(), PrintError>;
}
