use std::path::Path;

use serde::Serialize;

use super::error::PrintError;

/// A document loaded into memory, ready to submit to any number of devices.
#[derive(Debug, Clone)]
pub struct Document {
    /// Job title shown by the print system.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a staged file. The job title is the file name.
    pub async fn load(path: &Path) -> Result<Self, PrintError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| PrintError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Ok(Self { name, bytes })
    }
}

/// What happened when a document was offered to one configured target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// Submitted to the device, whose live name may differ in case from the target.
    Submitted { device: String },
    /// No live device matches the target name.
    NotFound,
    /// The sink refused or failed the submission.
    Failed { reason: String },
    /// Nothing was attempted, e.g. the document could not be loaded.
    Skipped { reason: String },
}

impl DeliveryOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }
}

/// Outcome for one configured target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceOutcome {
    pub target: String,
    #[serde(flatten)]
    pub outcome: DeliveryOutcome,
}
