//! Wiring between configuration and the advice generator.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use flow_advice_gemini::{GeminiClient, GeminiSettings};
use flow_config::AdviceConfig;
use flow_core::{AdviceError, AdviceGenerator, AdviceOptions};
use tracing::debug;

/// Stands in for the service when no credential is configured. Every request
/// fails, which the advice adapter reports with its generic failure text.
#[derive(Debug, Clone)]
pub struct UnconfiguredGenerator {
    env_var: String,
}

impl UnconfiguredGenerator {
    pub fn new(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
        }
    }
}

#[async_trait]
impl AdviceGenerator for UnconfiguredGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Option<String>, AdviceError> {
        Err(AdviceError::MissingCredential(self.env_var.clone()))
    }
}

/// Gemini client when the credential variable is set, otherwise [`UnconfiguredGenerator`].
pub fn generator_for(config: &AdviceConfig) -> Arc<dyn AdviceGenerator> {
    match config.api_key() {
        Some(api_key) => {
            let settings = GeminiSettings {
                endpoint: config.endpoint.clone(),
                model: config.model.clone(),
                api_key,
            };
            Arc::new(GeminiClient::new(settings))
        }
        None => {
            debug!(env = %config.api_key_env, "No advice credential configured.");
            Arc::new(UnconfiguredGenerator::new(config.api_key_env.clone()))
        }
    }
}

pub fn options_for(config: &AdviceConfig) -> AdviceOptions {
    AdviceOptions {
        timeout: Duration::from_secs(config.timeout_secs.max(1)),
        recent_limit: config.recent_limit,
    }
}
