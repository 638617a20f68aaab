pub mod image;
pub mod text;
pub mod url;
pub mod youtube;

use crate::config::PipelineConfig;
use crate::error::{ExtractionError, ImportError};
use crate::media::{self, ImageStore};
use crate::model::ValidatedRecipe;
use crate::providers::AiBackend;
use crate::url_to_text::fetchers::RequestFetcher;
use crate::url_to_text::{SearchExtractor, TextNormalizer};
use crate::validation::{sanitize, validate};
use log::debug;
use std::sync::Arc;

/// Everything a pipeline run needs, built once during setup.
pub struct PipelineContext {
    pub backend: Arc<dyn AiBackend>,
    pub fetcher: RequestFetcher,
    pub config: PipelineConfig,
    pub image_store: Option<Arc<dyn ImageStore>>,
}

impl PipelineContext {
    pub fn new(config: PipelineConfig, backend: Arc<dyn AiBackend>) -> Result<Self, ImportError> {
        let fetcher = RequestFetcher::new(
            &config.user_agent,
            config.timeouts.fetch(),
            config.timeouts.probe(),
        )?;

        Ok(Self {
            backend,
            fetcher,
            config,
            image_store: None,
        })
    }

    pub fn with_image_store(mut self, store: Arc<dyn ImageStore>) -> Self {
        self.image_store = Some(store);
        self
    }

    pub(crate) fn image_store(&self) -> Option<&dyn ImageStore> {
        self.image_store.as_deref()
    }

    pub(crate) fn normalizer(&self) -> TextNormalizer {
        TextNormalizer::new(
            self.backend.clone(),
            self.config.timeouts.text_normalize(),
            self.config.retry.ai_generation.policy(),
        )
    }

    pub(crate) fn search(&self) -> SearchExtractor {
        SearchExtractor::new(
            self.backend.clone(),
            self.config.timeouts.page_text(),
            self.config.timeouts.transcript(),
            self.config.retry.ai_generation.policy(),
        )
    }

    /// Text normalizer, then sanitize and validate
    pub(crate) async fn structure_text(
        &self,
        text: &str,
        source: &str,
        source_url: Option<&str>,
    ) -> Result<ValidatedRecipe, ExtractionError> {
        let value = self.normalizer().normalize(text, source).await?;
        let mut draft = sanitize(&value);
        draft.source_url = source_url.map(str::to_string);
        debug!(
            "Structured '{}' with {} ingredients and {} instructions",
            draft.title,
            draft.ingredients.len(),
            draft.instructions.len()
        );
        validate(draft)
    }

    /// AI photo for a recipe without one, unless image generation is disabled
    pub(crate) async fn generate_image(&self, recipe: &mut ValidatedRecipe) {
        if !self.config.generate_images {
            debug!("Image generation disabled, leaving '{}' without image", recipe.title);
            return;
        }
        media::attach_generated_image(
            recipe,
            self.backend.as_ref(),
            self.image_store(),
            self.config.timeouts.image_generation(),
        )
        .await;
    }
}
