use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by print sinks.
#[derive(Debug, Error)]
pub enum PrintError {
    /// The named device is not known to the sink.
    #[error("Printer not found: {device}")]
    DeviceNotFound { device: String },

    /// The print command could not be started.
    #[error("Failed to run {command}: {reason}")]
    Spawn { command: String, reason: String },

    /// The print system refused the job.
    #[error("Printer {device} rejected the job: {stderr}")]
    Rejected { device: String, stderr: String },

    /// Device enumeration failed.
    #[error("Could not list printers: {reason}")]
    Enumerate { reason: String },

    /// The staged document could not be read.
    #[error("Failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
