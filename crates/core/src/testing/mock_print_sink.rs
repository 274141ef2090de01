//! Mock print sink for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::journal::CallJournal;
use crate::printing::{Document, PrintError, PrintSink};

/// A submission accepted by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    pub document: String,
    pub device: String,
    pub bytes: Vec<u8>,
}

/// Print sink with a controllable device list.
#[derive(Debug, Clone, Default)]
pub struct MockPrintSink {
    devices: Arc<RwLock<Vec<String>>>,
    submissions: Arc<RwLock<Vec<RecordedSubmission>>>,
    failing_devices: Arc<RwLock<HashSet<String>>>,
    next_list_error: Arc<RwLock<Option<PrintError>>>,
    list_calls: Arc<RwLock<usize>>,
    journal: Option<CallJournal>,
}

impl MockPrintSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_devices(devices: &[&str]) -> Self {
        Self {
            devices: Arc::new(RwLock::new(
                devices.iter().map(|d| d.to_string()).collect(),
            )),
            ..Self::default()
        }
    }

    pub fn with_journal(mut self, journal: CallJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub async fn set_devices(&self, devices: &[&str]) {
        *self.devices.write().await = devices.iter().map(|d| d.to_string()).collect();
    }

    /// Submissions to `device` fail with a rejection.
    pub async fn fail_device(&self, device: &str) {
        self.failing_devices.write().await.insert(device.to_string());
    }

    pub async fn set_next_list_error(&self, error: PrintError) {
        *self.next_list_error.write().await = Some(error);
    }

    pub async fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.read().await.clone()
    }

    pub async fn submission_count(&self) -> usize {
        self.submissions.read().await.len()
    }

    /// How many times the device list was queried.
    pub async fn list_calls(&self) -> usize {
        *self.list_calls.read().await
    }
}

#[async_trait]
impl PrintSink for MockPrintSink {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_devices(&self) -> Result<Vec<String>, PrintError> {
        *self.list_calls.write().await += 1;
        if let Some(error) = self.next_list_error.write().await.take() {
            return Err(error);
        }
        Ok(self.devices.read().await.clone())
    }

    async fn submit(&self, document: &Document, device: &str) -> Result<(), PrintError> {
        if !self.devices.read().await.iter().any(|d| d == device) {
            return Err(PrintError::DeviceNotFound {
                device: device.to_string(),
            });
        }
        if self.failing_devices.read().await.contains(device) {
            return Err(PrintError::Rejected {
                device: device.to_string(),
                stderr: "simulated rejection".to_string(),
            });
        }

        if let Some(journal) = &self.journal {
            journal
                .record(format!("print:{}@{}", document.name, device))
                .await;
        }
        self.submissions.write().await.push(RecordedSubmission {
            document: document.name.clone(),
            device: device.to_string(),
            bytes: document.bytes.clone(),
        });
        Ok(())
    }
}
