//! Configuration file location
//!
//! `SERVICE_MAP_CONFIG_DIR` wins. Otherwise the per-user config home is used:
//! `$XDG_CONFIG_HOME` or `~/.config` on Unix, the roaming AppData folder on
//! Windows.

use std::path::PathBuf;

use directories::BaseDirs;

const APP_DIR: &str = "service-map";
const CONFIG_FILE: &str = "config.yaml";

/// Directory holding `config.yaml`
pub fn config_dir() -> PathBuf {
    match std::env::var_os("SERVICE_MAP_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => config_home().join(APP_DIR),
    }
}

/// Config file read when `--config` is not given
pub fn root_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

#[cfg(not(windows))]
fn config_home() -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| BaseDirs::new().map(|dirs| dirs.home_dir().join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"))
}

#[cfg(windows)]
fn config_home() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
