//! Dry-run sink that logs instead of printing.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::info;

use super::error::PrintError;
use super::traits::PrintSink;
use super::types::Document;

/// Reports a fixed device list and logs every submission.
pub struct LogPrintSink {
    devices: Vec<String>,
    submitted: AtomicU64,
}

impl LogPrintSink {
    pub fn new(devices: Vec<String>) -> Self {
        Self {
            devices,
            submitted: AtomicU64::new(0),
        }
    }

    /// Number of documents accepted so far.
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PrintSink for LogPrintSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn list_devices(&self) -> Result<Vec<String>, PrintError> {
        Ok(self.devices.clone())
    }

    async fn submit(&self, document: &Document, device: &str) -> Result<(), PrintError> {
        if !self.devices.iter().any(|d| d == device) {
            return Err(PrintError::DeviceNotFound {
                device: device.to_string(),
            });
        }
        self.submitted.fetch_add(1, Ordering::Relaxed);
        info!(
            device = %device,
            bytes = document.bytes.len(),
            "Dry run: would print {}",
            document.name
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_sink_counts_known_devices_only() {
        let sink = LogPrintSink::new(vec!["Kitchen1".to_string()]);
        let doc = Document::new("order_20240101110000.pdf", vec![1, 2, 3]);

        sink.submit(&doc, "Kitchen1").await.unwrap();
        let err = sink.submit(&doc, "Kitchen2").await.unwrap_err();

        assert!(matches!(err, PrintError::DeviceNotFound { .. }));
        assert_eq!(sink.submitted(), 1);
        assert_eq!(sink.list_devices().await.unwrap(), vec!["Kitchen1"]);
    }
}
