use super::PipelineContext;
use crate::error::ExtractionError;
use crate::model::ValidatedRecipe;
use crate::url_to_text::youtube::{thumbnail_url, video_id};
use crate::utils::normalize_url;
use log::info;

/// Extract a recipe from a YouTube video through its transcript.
///
/// A video without a usable transcript is `NoRecipeFound`. The photo is the
/// video thumbnail when the ID can be read from the URL, a generated image
/// otherwise.
pub async fn process(ctx: &PipelineContext, input: &str) -> Result<ValidatedRecipe, ExtractionError> {
    let url = normalize_url(input)?;
    info!("Extracting recipe from video {}", url);

    let transcript = ctx.search().transcript(&url).await?.ok_or_else(|| {
        ExtractionError::no_recipe("No transcript available for this video").with_source_url(&url)
    })?;

    let mut recipe = ctx
        .structure_text(&transcript, &url, Some(url.as_str()))
        .await?;

    match video_id(&url) {
        Some(id) => {
            recipe.attach_image(thumbnail_url(&id));
        }
        None => ctx.generate_image(&mut recipe).await,
    }

    info!("Structured video transcript for '{}'", recipe.title);
    Ok(recipe)
}
