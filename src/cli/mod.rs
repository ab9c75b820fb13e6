//! CLI command handling module
//!
//! Handles the configuration subcommands and logging setup.

mod commands;
mod logging;
mod version;

pub use commands::{ConfigSubcommand, handle_config_command};
pub use logging::*;
pub use version::display_version;
