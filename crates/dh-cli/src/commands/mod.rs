//! CLI command implementations

mod config;
mod status;

pub use config::{config_init, config_path, config_show};
pub use status::{describe_status, status_command, StatusArgs};
