use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub printing: PrintingConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Control API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    8470
}

/// Settings database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Passphrase the at-rest password encryption key is derived from.
    pub secret_key: String,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("kitchenprint.db")
}

/// Where order documents are picked up from
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub backend: RemoteBackend,
    /// Remote directory that is polled.
    #[serde(default = "default_remote_dir")]
    pub directory: String,
    /// Filename prefix, documents are named `<prefix>_<yyyyMMddHHmmss>.pdf`.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub ftp: FtpConfig,
    /// Required when backend = "local"
    #[serde(default)]
    pub local: Option<LocalDirConfig>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            backend: RemoteBackend::default(),
            directory: default_remote_dir(),
            prefix: default_prefix(),
            ftp: FtpConfig::default(),
            local: None,
        }
    }
}

fn default_remote_dir() -> String {
    "/".to_string()
}

fn default_prefix() -> String {
    "order".to_string()
}

/// Available remote backends
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RemoteBackend {
    #[default]
    Ftp,
    Local,
}

/// FTP transport tuning. Host and credentials live in the settings store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FtpConfig {
    /// Port used when the stored server has none.
    #[serde(default = "default_ftp_port")]
    pub port: u16,
    /// Connect/read/write timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for FtpConfig {
    fn default() -> Self {
        Self {
            port: default_ftp_port(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_ftp_port() -> u16 {
    21
}

fn default_timeout() -> u32 {
    30
}

/// Local drop-folder backend
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocalDirConfig {
    pub root: PathBuf,
}

/// Print output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrintingConfig {
    #[serde(default)]
    pub backend: PrintBackend,
    /// Where fetched documents are written before printing.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,
    #[serde(default = "default_lp")]
    pub lp_command: String,
    #[serde(default = "default_lpstat")]
    pub lpstat_command: String,
    /// Devices reported by the log backend.
    #[serde(default)]
    pub log_devices: Vec<String>,
}

impl Default for PrintingConfig {
    fn default() -> Self {
        Self {
            backend: PrintBackend::default(),
            staging_dir: default_staging_dir(),
            lp_command: default_lp(),
            lpstat_command: default_lpstat(),
            log_devices: Vec::new(),
        }
    }
}

fn default_staging_dir() -> PathBuf {
    std::env::temp_dir().join("kitchenprint")
}

fn default_lp() -> String {
    "lp".to_string()
}

fn default_lpstat() -> String {
    "lpstat".to_string()
}

/// Available print backends
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PrintBackend {
    #[default]
    Cups,
    /// Dry run: log submissions instead of printing.
    Log,
}

/// Scheduler boot behavior
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Launch the polling cycle at startup when settings are complete.
    #[serde(default)]
    pub autostart: bool,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub storage: SanitizedStorageConfig,
    pub remote: RemoteConfig,
    pub printing: PrintingConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStorageConfig {
    pub path: PathBuf,
    pub secret_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            storage: SanitizedStorageConfig {
                path: config.storage.path.clone(),
                secret_key_configured: !config.storage.secret_key.is_empty(),
            },
            remote: config.remote.clone(),
            printing: config.printing.clone(),
            scheduler: config.scheduler.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
[storage]
secret_key = "pepper"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8470);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.storage.path.to_str().unwrap(), "kitchenprint.db");
        assert_eq!(config.remote.backend, RemoteBackend::Ftp);
        assert_eq!(config.remote.directory, "/");
        assert_eq!(config.remote.prefix, "order");
        assert_eq!(config.remote.ftp.port, 21);
        assert_eq!(config.printing.backend, PrintBackend::Cups);
        assert_eq!(config.printing.lp_command, "lp");
        assert!(!config.scheduler.autostart);
    }

    #[test]
    fn test_deserialize_missing_storage_fails() {
        let toml = r#"
[server]
port = 8080
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_log_printing() {
        let toml = r#"
[storage]
secret_key = "pepper"

[printing]
backend = "log"
staging_dir = "/var/spool/kitchenprint"
log_devices = ["Kitchen1", "Bar"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.printing.backend, PrintBackend::Log);
        assert_eq!(
            config.printing.staging_dir.to_str().unwrap(),
            "/var/spool/kitchenprint"
        );
        assert_eq!(config.printing.log_devices, vec!["Kitchen1", "Bar"]);
    }

    #[test]
    fn test_sanitized_config_hides_secret() {
        let toml = r#"
[storage]
secret_key = "pepper"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.storage.secret_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("pepper"));
    }
}
