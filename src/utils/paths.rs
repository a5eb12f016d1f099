use std::{env, path::PathBuf};

use flow_config::model::default_app_home;

/// Environment variable overriding the application home directory.
pub const HOME_ENV: &str = "FINANCEFLOW_HOME";

/// `$FINANCEFLOW_HOME` when set and non-empty, otherwise `~/.financeflow`.
pub fn app_home() -> PathBuf {
    match env::var_os(HOME_ENV) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => default_app_home(),
    }
}
