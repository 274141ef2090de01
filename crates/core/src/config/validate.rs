use super::{types::Config, ConfigError, RemoteBackend};

/// Validate configuration
/// Currently validates:
/// - Control API port is not 0
/// - A secret key is configured
/// - The filename prefix is not empty
/// - The local backend has a root directory
/// - The staging directory is set
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.storage.secret_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.secret_key cannot be empty".to_string(),
        ));
    }

    if config.remote.prefix.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "remote.prefix cannot be empty".to_string(),
        ));
    }

    if config.remote.backend == RemoteBackend::Local && config.remote.local.is_none() {
        return Err(ConfigError::ValidationError(
            "remote.backend = \"local\" requires a [remote.local] section".to_string(),
        ));
    }

    if config.printing.staging_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "printing.staging_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
