use std::path::PathBuf;

pub use flow_config::{AdviceConfig, Config, ConfigError, ConfigManager};

use crate::utils::paths;

/// Manager for `<app home>/config/config.json`.
pub fn default_manager() -> Result<ConfigManager, ConfigError> {
    ConfigManager::with_base_dir(paths::app_home())
}

pub fn manager_with_base(base: PathBuf) -> Result<ConfigManager, ConfigError> {
    ConfigManager::with_base_dir(base)
}
