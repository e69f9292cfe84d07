// Configuration management module
// TOML-backed settings for the upstream catalog and the HTTP server

pub mod settings;

pub use settings::{Config, ConfigError, ServerConfig, UpstreamConfig};

/// Get the configuration directory path
#[inline]
pub fn get_config_dir() -> Result<std::path::PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("stac-cache"))
        .ok_or(ConfigError::DirectoryError)
}
