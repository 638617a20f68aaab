use super::PipelineContext;
use crate::error::ExtractionError;
use crate::images_to_text::{analyze_image, ImageSource};
use crate::media;
use crate::model::ValidatedRecipe;
use crate::validation::{sanitize, validate};
use log::info;

/// Read a recipe off a photo with one vision call.
///
/// There is no fallback tier. The photo itself becomes the recipe image.
pub async fn process(
    ctx: &PipelineContext,
    source: &ImageSource,
) -> Result<ValidatedRecipe, ExtractionError> {
    let image = source.load().await?;
    info!("Extracting recipe from {} image", image.mime_type);

    let value = analyze_image(
        ctx.backend.as_ref(),
        &image,
        ctx.config.timeouts.image_analysis(),
        &ctx.config.retry.ai_generation.policy(),
    )
    .await?;

    let mut draft = sanitize(&value);
    draft.image_urls.clear();
    draft.source_url = None;
    let mut recipe = validate(draft)?;

    if let Some(url) = media::image_url(&image, ctx.image_store()).await {
        recipe.attach_image(url);
    }
    Ok(recipe)
}
