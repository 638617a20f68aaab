use super::PipelineContext;
use crate::error::ExtractionError;
use crate::model::ValidatedRecipe;
use log::info;

/// Structure pasted recipe text and give it a generated photo
pub async fn process(ctx: &PipelineContext, text: &str) -> Result<ValidatedRecipe, ExtractionError> {
    let mut recipe = ctx.structure_text(text, "direct-input", None).await?;
    ctx.generate_image(&mut recipe).await;
    info!("Structured pasted text for '{}'", recipe.title);
    Ok(recipe)
}
