//! CUPS print sink driving the `lp`/`lpstat` command line tools.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::error::PrintError;
use super::traits::PrintSink;
use super::types::Document;
use crate::config::PrintingConfig;

/// Prints through the local CUPS client tools.
pub struct CupsPrintSink {
    lp_command: String,
    lpstat_command: String,
}

impl CupsPrintSink {
    pub fn new(config: &PrintingConfig) -> Self {
        Self {
            lp_command: config.lp_command.clone(),
            lpstat_command: config.lpstat_command.clone(),
        }
    }

    fn spawn_err(command: &str, e: std::io::Error) -> PrintError {
        PrintError::Spawn {
            command: command.to_string(),
            reason: e.to_string(),
        }
    }
}

/// `lpstat -e` prints one destination per line.
fn parse_destinations(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl PrintSink for CupsPrintSink {
    fn name(&self) -> &str {
        "cups"
    }

    async fn list_devices(&self) -> Result<Vec<String>, PrintError> {
        let output = Command::new(&self.lpstat_command)
            .arg("-e")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Self::spawn_err(&self.lpstat_command, e))?;

        if !output.status.success() {
            return Err(PrintError::Enumerate {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(parse_destinations(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn submit(&self, document: &Document, device: &str) -> Result<(), PrintError> {
        let mut child = Command::new(&self.lp_command)
            .args(["-d", device, "-t", document.name.as_str(), "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Self::spawn_err(&self.lp_command, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&document.bytes).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(PrintError::Rejected {
                device: device.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(
            "lp accepted {} for {}: {}",
            document.name,
            device,
            String::from_utf8_lossy(&output.stdout).trim()
        );
        Ok(())
    }
}
