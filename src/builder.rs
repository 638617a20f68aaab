use std::error::Error as _;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::config::{PipelineConfig, ProviderConfig};
use crate::error::{ExtractionError, ImportError};
use crate::images_to_text::ImageSource;
use crate::media::ImageStore;
use crate::model::ValidatedRecipe;
use crate::pipelines::{self, PipelineContext};
use crate::providers::{AiBackend, ProviderFactory};
use crate::utils::normalize_url;

/// AI provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Google,
    OpenAI,
}

impl LlmProvider {
    /// Convert to provider name string used by the factory
    fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Google => "google",
            LlmProvider::OpenAI => "openai",
        }
    }
}

/// Builder for a [`RecipeImporter`]
#[derive(Default)]
pub struct RecipeImporterBuilder {
    config: Option<PipelineConfig>,
    provider: Option<LlmProvider>,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    backend: Option<Arc<dyn AiBackend>>,
    image_store: Option<Arc<dyn ImageStore>>,
    fetch_timeout: Option<Duration>,
    generate_images: Option<bool>,
}

impl RecipeImporterBuilder {
    /// Start from an explicit configuration instead of the defaults
    ///
    /// # Example
    /// ```no_run
    /// use recipe_extract::{PipelineConfig, RecipeImporter};
    ///
    /// let config = PipelineConfig::load()?;
    /// let importer = RecipeImporter::builder().config(config).build()?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a specific provider and turn off the fallback chain
    ///
    /// # Example
    /// ```
    /// use recipe_extract::{LlmProvider, RecipeImporter};
    ///
    /// let builder = RecipeImporter::builder()
    ///     .provider(LlmProvider::OpenAI)
    ///     .api_key("sk-test");
    /// ```
    pub fn provider(mut self, provider: LlmProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the API key for the selected provider
    ///
    /// This allows passing the API key directly instead of relying on
    /// environment variables or config files.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the selected provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Point the selected provider at a proxy or compatible endpoint
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Use a ready-made backend instead of building one from configuration
    pub fn backend(mut self, backend: Arc<dyn AiBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Upload photos here instead of inlining them as data URLs
    pub fn image_store(mut self, store: Arc<dyn ImageStore>) -> Self {
        self.image_store = Some(store);
        self
    }

    /// Set the deadline for page fetches
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeImporter;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeImporter::builder().fetch_timeout(Duration::from_secs(10));
    /// ```
    pub fn fetch_timeout(mut self, duration: Duration) -> Self {
        self.fetch_timeout = Some(duration);
        self
    }

    /// Enable or disable AI image generation for recipes without a photo
    pub fn generate_images(mut self, enabled: bool) -> Self {
        self.generate_images = Some(enabled);
        self
    }

    /// Build the importer
    ///
    /// # Errors
    /// Returns `ImportError` if:
    /// - `.backend()` is combined with provider options
    /// - The selected provider is unknown, disabled or has no API key
    /// - The HTTP client cannot be created
    pub fn build(self) -> Result<RecipeImporter, ImportError> {
        let has_provider_options = self.provider.is_some()
            || self.api_key.is_some()
            || self.model.is_some()
            || self.base_url.is_some();
        if self.backend.is_some() && has_provider_options {
            return Err(ImportError::BuilderError(
                "Cannot combine .backend() with provider, api_key, model or base_url".to_string(),
            ));
        }

        let mut config = self.config.unwrap_or_default();
        if let Some(timeout) = self.fetch_timeout {
            config.timeouts.fetch = timeout.as_secs().max(1);
        }
        if let Some(enabled) = self.generate_images {
            config.generate_images = enabled;
        }

        if has_provider_options {
            let name = self
                .provider
                .map(|p| p.as_str().to_string())
                .unwrap_or_else(|| config.ai.default_provider.clone());
            let provider_config = config
                .ai
                .providers
                .entry(name.clone())
                .or_insert_with(|| ProviderConfig::for_provider(&name));
            if let Some(key) = self.api_key {
                provider_config.api_key = Some(key);
            }
            if let Some(model) = self.model {
                provider_config.model = model;
            }
            if let Some(base_url) = self.base_url {
                provider_config.base_url = Some(base_url);
            }
            if self.provider.is_some() {
                config.ai.fallback.enabled = false;
            }
            config.ai.default_provider = name;
        }

        let backend = match self.backend {
            Some(backend) => backend,
            None => ProviderFactory::from_config(&config.ai)?,
        };
        debug!("Using AI backend '{}'", backend.provider_name());

        let mut context = PipelineContext::new(config, backend)?;
        if let Some(store) = self.image_store {
            context = context.with_image_store(store);
        }

        Ok(RecipeImporter { context })
    }
}

/// Entry point of the extraction pipeline.
///
/// Build one during setup and share it; it holds no per-request state.
pub struct RecipeImporter {
    context: PipelineContext,
}

impl RecipeImporter {
    /// Creates a new builder for an importer
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder();
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.context.config
    }

    /// Recipe from a web page: markup, then page text, then search
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_extract::RecipeImporter;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let importer = RecipeImporter::builder().build()?;
    /// let recipe = importer
    ///     .extract_recipe_from_url("https://example.com/tomato-soup")
    ///     .await?;
    /// println!("{}", recipe.title);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn extract_recipe_from_url(&self, url: &str) -> Result<ValidatedRecipe, ExtractionError> {
        pipelines::url::process(&self.context, url)
            .await
            .map_err(|e| log_failure("URL extraction", e))
    }

    /// Recipe from a YouTube video transcript
    pub async fn generate_recipe_from_youtube_url(
        &self,
        url: &str,
    ) -> Result<ValidatedRecipe, ExtractionError> {
        pipelines::youtube::process(&self.context, url)
            .await
            .map_err(|e| log_failure("Video extraction", e))
    }

    /// Recipe read off a photo
    pub async fn generate_recipe_from_image(
        &self,
        source: &ImageSource,
    ) -> Result<ValidatedRecipe, ExtractionError> {
        pipelines::image::process(&self.context, source)
            .await
            .map_err(|e| log_failure("Image extraction", e))
    }

    /// Recipe from pasted text
    pub async fn generate_recipe_from_text(&self, text: &str) -> Result<ValidatedRecipe, ExtractionError> {
        pipelines::text::process(&self.context, text)
            .await
            .map_err(|e| log_failure("Text extraction", e))
    }

    /// Whether `url` answers within the probe deadline
    pub async fn is_reachable(&self, url: &str) -> bool {
        match normalize_url(url) {
            Ok(url) => self.context.fetcher.probe(&url).await,
            Err(_) => false,
        }
    }
}

fn log_failure(operation: &str, err: ExtractionError) -> ExtractionError {
    warn!(
        "{} failed [{}]{}: {}",
        operation,
        err.code,
        err.source_url
            .as_deref()
            .map(|u| format!(" for {u}"))
            .unwrap_or_default(),
        err.message
    );
    if let Some(cause) = err.source() {
        debug!("Caused by: {}", cause);
    }
    err
}
