use crate::config::AiConfig;
use crate::error::ExtractionError;
use crate::images_to_text::ImageData;
use crate::providers::{AiBackend, ProviderFactory, StructuredRequest};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;

/// Tries each configured provider in order until one answers.
///
/// Retrying a single provider is not done here; that is the job of the
/// pipeline's retry policy, which wraps the whole chain.
pub struct FallbackProvider {
    providers: Vec<Arc<dyn AiBackend>>,
}

impl FallbackProvider {
    /// Create a new fallback provider from configuration
    pub fn new(config: &AiConfig) -> Result<Self, String> {
        let mut providers: Vec<Arc<dyn AiBackend>> = Vec::new();

        // Create providers in fallback order
        for provider_name in &config.fallback.order {
            if let Some(provider_config) = config.providers.get(provider_name) {
                if provider_config.enabled {
                    match ProviderFactory::create(provider_name, provider_config) {
                        Ok(provider) => {
                            info!("Added '{}' to fallback chain", provider_name);
                            providers.push(provider);
                        }
                        Err(e) => {
                            warn!("Failed to initialize provider '{}': {}", provider_name, e);
                        }
                    }
                }
            } else {
                warn!(
                    "Provider '{}' in fallback order not found in configuration",
                    provider_name
                );
            }
        }

        Self::from_providers(providers)
    }

    /// Chain already constructed backends, first to last
    pub fn from_providers(providers: Vec<Arc<dyn AiBackend>>) -> Result<Self, String> {
        if providers.is_empty() {
            return Err("No providers available in fallback configuration".into());
        }
        Ok(FallbackProvider { providers })
    }

    /// Number of providers in the chain
    pub(crate) fn len(&self) -> usize {
        self.providers.len()
    }

    async fn first_success<'a, T, F, Fut>(&'a self, call: F) -> Result<T, ExtractionError>
    where
        F: Fn(&'a dyn AiBackend) -> Fut,
        Fut: Future<Output = Result<T, ExtractionError>>,
    {
        let mut failures: Vec<String> = Vec::new();
        let mut last_error = None;

        for provider in &self.providers {
            match call(provider.as_ref()).await {
                Ok(result) => {
                    debug!("Provider {} answered", provider.provider_name());
                    return Ok(result);
                }
                Err(e) => {
                    warn!("Provider {} failed: {}", provider.provider_name(), e);
                    failures.push(format!("{}: {}", provider.provider_name(), e));
                    last_error = Some(e);
                }
            }
        }

        // The chain is never empty, so at least one error was recorded
        let last = last_error.unwrap_or_else(|| ExtractionError::network("No providers available"));
        Err(ExtractionError {
            message: format!("All providers failed: {}", failures.join("; ")),
            ..last
        })
    }
}

#[async_trait]
impl AiBackend for FallbackProvider {
    fn provider_name(&self) -> &str {
        "fallback"
    }

    async fn generate_structured(
        &self,
        request: StructuredRequest<'_>,
    ) -> Result<String, ExtractionError> {
        self.first_success(|provider| provider.generate_structured(request))
            .await
    }

    async fn search_text(&self, prompt: &str) -> Result<String, ExtractionError> {
        self.first_success(|provider| provider.search_text(prompt)).await
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<ImageData>, ExtractionError> {
        let mut last_error = None;
        for provider in &self.providers {
            match provider.generate_image(prompt).await {
                Ok(Some(image)) => return Ok(Some(image)),
                Ok(None) => debug!("Provider {} produced no image", provider.provider_name()),
                Err(e) => {
                    warn!("Provider {} image generation failed: {}", provider.provider_name(), e);
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }
}
