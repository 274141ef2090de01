//! FTP transport.
//!
//! Uses the blocking `suppaftp` client on tokio's blocking pool. Every call
//! connects, logs in, runs one command and quits, so no session outlives a call.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream};
use tracing::debug;

use super::error::TransportError;
use super::traits::RemoteTransport;
use super::types::{remote_path, RemoteEndpoint};
use crate::config::FtpConfig;

/// FTP-backed remote transport.
pub struct FtpTransport {
    config: FtpConfig,
}

impl FtpTransport {
    pub fn new(config: FtpConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FtpConfig::default())
    }

    /// Run `op` inside a fresh logged-in session on the blocking pool.
    async fn with_session<T, F>(
        &self,
        endpoint: &RemoteEndpoint,
        op: F,
    ) -> Result<T, TransportError>
    where
        T: Send + 'static,
        F: FnOnce(&mut FtpStream) -> Result<T, TransportError> + Send + 'static,
    {
        let config = self.config.clone();
        let endpoint = endpoint.clone();

        tokio::task::spawn_blocking(move || {
            let mut ftp = open_session(&config, &endpoint)?;
            let result = op(&mut ftp);
            if let Err(e) = ftp.quit() {
                debug!("FTP logout from {} failed: {}", endpoint.server, e);
            }
            result
        })
        .await
        .map_err(|e| TransportError::Task(e.to_string()))?
    }
}

fn resolve(server: &str, default_port: u16) -> Result<SocketAddr, TransportError> {
    let host = server.trim().trim_start_matches("ftp://").trim_end_matches('/');
    let target = if host.contains(':') {
        host.to_string()
    } else {
        format!("{}:{}", host, default_port)
    };

    target
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| TransportError::UnknownHost {
            server: server.to_string(),
        })
}

fn open_session(config: &FtpConfig, endpoint: &RemoteEndpoint) -> Result<FtpStream, TransportError> {
    let timeout = Duration::from_secs(u64::from(config.timeout_secs.max(1)));
    let addr = resolve(&endpoint.server, config.port)?;

    let connect_err = |reason: String| TransportError::Connect {
        server: endpoint.server.clone(),
        reason,
    };

    let mut ftp = FtpStream::connect_timeout(addr, timeout).map_err(|e| connect_err(e.to_string()))?;
    ftp.get_ref()
        .set_read_timeout(Some(timeout))
        .map_err(|e| connect_err(e.to_string()))?;
    ftp.get_ref()
        .set_write_timeout(Some(timeout))
        .map_err(|e| connect_err(e.to_string()))?;

    match ftp.login(endpoint.username.as_str(), endpoint.password.as_str()) {
        Ok(()) => {}
        Err(FtpError::UnexpectedResponse(_)) => {
            return Err(TransportError::Auth {
                username: endpoint.username.clone(),
            });
        }
        Err(e) => return Err(connect_err(e.to_string())),
    }

    ftp.transfer_type(FileType::Binary)
        .map_err(|e| connect_err(e.to_string()))?;

    Ok(ftp)
}

fn transfer_err(path: &str, e: FtpError) -> TransportError {
    TransportError::Transfer {
        path: path.to_string(),
        reason: e.to_string(),
    }
}

/// NLST may return bare names or paths depending on the server.
fn base_name(entry: &str) -> &str {
    entry.rsplit('/').next().unwrap_or(entry)
}

#[async_trait]
impl RemoteTransport for FtpTransport {
    fn name(&self) -> &str {
        "ftp"
    }

    async fn list_names(
        &self,
        endpoint: &RemoteEndpoint,
        directory: &str,
    ) -> Result<Vec<String>, TransportError> {
        let directory = directory.to_string();
        self.with_session(endpoint, move |ftp| {
            let entries = ftp
                .nlst(Some(directory.as_str()))
                .map_err(|e| transfer_err(&directory, e))?;
            Ok(entries
                .iter()
                .map(|entry| base_name(entry.trim()).to_string())
                .filter(|name| !name.is_empty())
                .collect())
        })
        .await
    }

    async fn fetch(
        &self,
        endpoint: &RemoteEndpoint,
        directory: &str,
        filename: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, TransportError> {
        let path = remote_path(directory, filename);
        let dest = dest_dir.join(filename);

        let staged = dest.clone();
        self.with_session(endpoint, move |ftp| {
            let buffer = ftp
                .retr_as_buffer(&path)
                .map_err(|e| transfer_err(&path, e))?;
            std::fs::write(&staged, buffer.into_inner())?;
            Ok(())
        })
        .await?;

        Ok(dest)
    }

    async fn delete(
        &self,
        endpoint: &RemoteEndpoint,
        directory: &str,
        filename: &str,
    ) -> Result<(), TransportError> {
        let path = remote_path(directory, filename);
        self.with_session(endpoint, move |ftp| {
            ftp.rm(&path).map_err(|e| transfer_err(&path, e))
        })
        .await
    }
}
