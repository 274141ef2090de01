use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Where the pipeline looks for documents and where it stages them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Remote directory to poll.
    pub directory: String,
    /// Documents are named `<prefix>_<yyyyMMddHHmmss>.pdf`.
    pub prefix: String,
    /// Local directory fetched documents are written to.
    pub staging_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            directory: "/".to_string(),
            prefix: "order".to_string(),
            staging_dir: std::env::temp_dir().join("kitchenprint"),
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            directory: config.remote.directory.clone(),
            prefix: config.remote.prefix.clone(),
            staging_dir: config.printing.staging_dir.clone(),
        }
    }
}
