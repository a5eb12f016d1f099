use std::{
    env,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

pub const DEFAULT_SLOT_NAME: &str = "financeFlowTransactions";
pub const DEFAULT_ADVICE_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ADVICE_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";

/// Stores user-configurable preferences for the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency")]
    pub currency: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional directory for the transaction slot. Defaults to `<app home>/data`.
    pub data_dir: Option<PathBuf>,

    #[serde(default = "Config::default_slot_name")]
    pub slot_name: String,

    #[serde(default)]
    pub advice: AdviceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            data_dir: None,
            slot_name: Self::default_slot_name(),
            advice: AdviceConfig::default(),
        }
    }
}

impl Config {
    pub fn default_currency() -> String {
        "USD".into()
    }

    pub fn default_slot_name() -> String {
        DEFAULT_SLOT_NAME.into()
    }

    pub fn resolve_data_dir(&self, app_home: &Path) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }
        app_home.join("data")
    }
}

/// Settings for the external advice service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceConfig {
    #[serde(default = "AdviceConfig::default_model")]
    pub model: String,
    #[serde(default = "AdviceConfig::default_endpoint")]
    pub endpoint: String,
    /// Name of the environment variable holding the service credential.
    #[serde(default = "AdviceConfig::default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "AdviceConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "AdviceConfig::default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            model: Self::default_model(),
            endpoint: Self::default_endpoint(),
            api_key_env: Self::default_api_key_env(),
            timeout_secs: Self::default_timeout_secs(),
            recent_limit: Self::default_recent_limit(),
        }
    }
}

impl AdviceConfig {
    pub fn default_model() -> String {
        DEFAULT_ADVICE_MODEL.into()
    }

    pub fn default_endpoint() -> String {
        DEFAULT_ADVICE_ENDPOINT.into()
    }

    pub fn default_api_key_env() -> String {
        DEFAULT_API_KEY_ENV.into()
    }

    pub fn default_timeout_secs() -> u64 {
        30
    }

    pub fn default_recent_limit() -> usize {
        10
    }

    /// Reads the credential from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        env::var(&self.api_key_env)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// `~/.financeflow`, or the current directory when no home can be resolved.
pub fn default_app_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".financeflow")
}
