use crate::config::{AiConfig, ProviderConfig};
use crate::error::ImportError;
use crate::providers::{AiBackend, FallbackProvider, GoogleProvider, OpenAIProvider};
use log::info;
use std::sync::Arc;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn AiBackend>, ImportError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(ImportError::ProviderError(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        let config = config.with_default_models(provider_name);
        match provider_name {
            "google" => Ok(Arc::new(
                GoogleProvider::new(&config).map_err(ImportError::ProviderError)?,
            )),
            "openai" => Ok(Arc::new(
                OpenAIProvider::new(&config).map_err(ImportError::ProviderError)?,
            )),
            _ => Err(ImportError::ProviderError(format!(
                "Unknown provider: {}",
                provider_name
            ))),
        }
    }

    /// Get the default provider from configuration.
    ///
    /// A default provider that has no entry in `providers` is created with
    /// [`ProviderConfig::for_provider`] defaults, taking its key from the
    /// environment.
    pub fn get_default_provider(config: &AiConfig) -> Result<Arc<dyn AiBackend>, ImportError> {
        let provider_name = &config.default_provider;
        match config.providers.get(provider_name) {
            Some(provider_config) => Self::create(provider_name, provider_config),
            None => {
                info!(
                    "Default provider '{}' not configured, using built-in defaults",
                    provider_name
                );
                Self::create(provider_name, &ProviderConfig::for_provider(provider_name))
            }
        }
    }

    /// Build the backend the pipeline should use: a fallback chain when
    /// enabled, otherwise the default provider
    pub fn from_config(config: &AiConfig) -> Result<Arc<dyn AiBackend>, ImportError> {
        if config.fallback.enabled {
            let chain = FallbackProvider::new(config).map_err(ImportError::ProviderError)?;
            info!("Using fallback chain of {} providers", chain.len());
            return Ok(Arc::new(chain));
        }
        Self::get_default_provider(config)
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google", "openai"]
    }
}
