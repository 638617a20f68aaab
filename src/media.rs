use crate::error::ExtractionError;
use crate::images_to_text::ImageData;
use crate::model::ValidatedRecipe;
use crate::providers::prompt::build_image_prompt;
use crate::providers::AiBackend;
use crate::utils::with_deadline;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::error::Error;
use std::time::Duration;

/// Durable storage for recipe photos
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the image and return a URL it can be displayed from
    async fn store(&self, image: &ImageData) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// URL for `image`: uploaded when a store is configured, otherwise inlined as
/// a data URL. A failed upload yields `None`.
pub async fn image_url(image: &ImageData, store: Option<&dyn ImageStore>) -> Option<String> {
    let Some(store) = store else {
        return Some(image.to_data_url());
    };

    match store.store(image).await {
        Ok(url) => {
            debug!("Stored {} byte image at {}", image.bytes.len(), url);
            Some(url)
        }
        Err(e) => {
            warn!("Image upload failed, continuing without image: {}", e);
            None
        }
    }
}

/// Generate a photo for `recipe` and attach it as an image.
///
/// Best-effort: a backend error, an empty answer or a failed upload are
/// logged and leave the recipe as it was. Returns whether an image was
/// attached.
pub async fn attach_generated_image(
    recipe: &mut ValidatedRecipe,
    backend: &dyn AiBackend,
    store: Option<&dyn ImageStore>,
    timeout: Duration,
) -> bool {
    let prompt = build_image_prompt(&recipe.title, &recipe.description);
    let generated: Result<Option<ImageData>, ExtractionError> =
        with_deadline(timeout, "Image generation timed out", backend.generate_image(&prompt)).await;

    let image = match generated {
        Ok(Some(image)) => image,
        Ok(None) => {
            info!("No image generated for '{}'", recipe.title);
            return false;
        }
        Err(e) => {
            warn!("Image generation failed for '{}' ({}): {}", recipe.title, e.code, e);
            return false;
        }
    };

    match image_url(&image, store).await {
        Some(url) => recipe.attach_image(url),
        None => false,
    }
}
