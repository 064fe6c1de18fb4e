use std::path::Path;
use anyhow::{anyhow, Result};

use crate::config::proc_loader::{default_config, file_to_config};
use crate::config::upstream::ServiceConfig;

/// Load config from `config_path`, or from the built-in env-driven template when absent.
pub async fn run(config_path: Option<&str>) -> Result<ServiceConfig> {
    match config_path {
        Some(path) => file_to_config(Path::new(path))
            .await
            .map_err(|e| anyhow!(format!("Invalid config '{}': {}", path, e))),
        None => default_config()
            .await
            .map_err(|e| anyhow!(format!("Invalid default config: {}", e))),
    }
}
