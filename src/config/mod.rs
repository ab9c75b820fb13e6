//! Configuration system for the service map server
//!
//! Built-in defaults, an optional YAML file, and `SERVICE_MAP_*` environment
//! overrides, layered in that order.

mod defaults;
pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, FetchConfig, KubeConfig, LogFormat, LoggerConfig, ServerConfig};

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &schema::Config, key: &str) -> anyhow::Result<String> {
    match key {
        "server.bindAddress" => Ok(config.server.bind_address.clone()),
        "server.port" => Ok(config.server.port.to_string()),
        "kube.context" => Ok(config.kube.context.clone().unwrap_or_default()),
        "fetch.concurrent" => Ok(config.fetch.concurrent.to_string()),
        "logger.level" => Ok(config.logger.level.clone()),
        "logger.format" => Ok(config.logger.format.to_string()),
        "logger.file" => Ok(config.logger.file.clone().unwrap_or_default()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}
