//! Configuration loading logic
//!
//! Handles loading configuration from its sources and layering them
//! according to precedence rules.

use super::{
    defaults, paths,
    schema::{Config, LogFormat},
};
use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers applied
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Config file (`path`, or the root config file if it exists)
    /// 3. Built-in defaults
    ///
    /// Command-line flags are applied on top by the caller.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let config = match path {
            Some(path) => Self::load_file(path)?,
            None => {
                let root = paths::root_config_path();
                if root.exists() {
                    Self::load_file(&root)?
                } else {
                    tracing::debug!("No config file at {}, using defaults", root.display());
                    Self::load_defaults()
                }
            }
        };

        let config = Self::apply_overrides(config, |key| std::env::var(key).ok());
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        defaults::default_config()
    }

    /// Check values serde cannot check on its own
    pub fn validate(config: &Config) -> Result<()> {
        if config.server.port == 0 {
            return Err(anyhow::anyhow!("server.port must be between 1 and 65535"));
        }
        Self::socket_addr(config)?;
        Ok(())
    }

    /// Address the HTTP server listens on
    pub fn socket_addr(config: &Config) -> Result<SocketAddr> {
        let ip: IpAddr = config.server.bind_address.parse().with_context(|| {
            format!(
                "server.bindAddress '{}' is not an IP address",
                config.server.bind_address
            )
        })?;
        Ok(SocketAddr::new(ip, config.server.port))
    }

    /// Apply overrides from `SERVICE_MAP_*` variables, read through `lookup`
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
        if let Some(addr) = lookup("SERVICE_MAP_BIND_ADDRESS") {
            config.server.bind_address = addr;
        }

        if let Some(port) = lookup("SERVICE_MAP_PORT") {
            match port.parse::<u16>() {
                Ok(port) => config.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid SERVICE_MAP_PORT '{}'", port),
            }
        }

        if let Some(context) = lookup("SERVICE_MAP_CONTEXT") {
            config.kube.context = if context.is_empty() {
                None
            } else {
                Some(context)
            };
        }

        if let Some(concurrent) = lookup("SERVICE_MAP_CONCURRENT_FETCH") {
            match concurrent.parse::<bool>() {
                Ok(val) => config.fetch.concurrent = val,
                Err(_) => tracing::warn!(
                    "Ignoring invalid SERVICE_MAP_CONCURRENT_FETCH '{}'",
                    concurrent
                ),
            }
        }

        if let Some(level) = lookup("SERVICE_MAP_LOG_LEVEL") {
            config.logger.level = level;
        }

        if let Some(format) = lookup("SERVICE_MAP_LOG_FORMAT") {
            match format.parse::<LogFormat>() {
                Ok(format) => config.logger.format = format,
                Err(e) => tracing::warn!("Ignoring SERVICE_MAP_LOG_FORMAT: {}", e),
            }
        }

        config
    }
}
