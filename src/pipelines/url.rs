use super::PipelineContext;
use crate::error::ExtractionError;
use crate::model::{PageMetadata, RecipeDraft, ValidatedRecipe};
use crate::url_to_text::html::extract_text;
use crate::url_to_text::html::extractors::{JsonLdExtractor, MetadataExtractor, ParsingContext};
use crate::utils::{normalize_url, with_retry};
use crate::validation::{sanitize_draft, validate};
use log::{debug, info, warn};

/// What could be read from the fetched HTML without any AI call
struct PageReading {
    markup: Option<RecipeDraft>,
    metadata: Option<PageMetadata>,
    text: String,
}

/// Extract a recipe from a web page.
///
/// This pipeline:
/// 1. Fetches the page (network retry policy)
/// 2. Accepts embedded JSON-LD recipe markup as is
/// 3. Otherwise, if the page has a title, structures its visible text
/// 4. Otherwise asks the search model for the recipe text and structures that
///
/// A failed tier falls through to the next one; a failed fetch goes straight
/// to step 4. Errors from the last tier are returned unchanged.
pub async fn process(ctx: &PipelineContext, input: &str) -> Result<ValidatedRecipe, ExtractionError> {
    let url = normalize_url(input)?;
    info!("Extracting recipe from {}", url);

    let policy = ctx.config.retry.network.policy();
    let html = match with_retry(&policy, || ctx.fetcher.fetch(&url)).await {
        Ok(html) => Some(html),
        Err(e) => {
            warn!("Could not fetch {} ({}): {}", url, e.code, e);
            None
        }
    };

    if let Some(html) = html {
        let page = read_page(&url, &html, ctx.config.max_page_text_chars);
        let og_image = page.metadata.as_ref().and_then(|m| m.image.clone());

        if let Some(draft) = page.markup {
            match accept_markup(draft, page.metadata.as_ref(), &url) {
                Ok(recipe) => {
                    info!("Found recipe markup for '{}'", recipe.title);
                    return Ok(finish(ctx, recipe, og_image).await);
                }
                Err(e) => warn!("Recipe markup on {} is unusable: {}", url, e),
            }
        }

        if let Some(metadata) = &page.metadata {
            let text = page_text_for(metadata, &page.text);
            match ctx.structure_text(&text, &url, Some(url.as_str())).await {
                Ok(recipe) => {
                    info!("Structured page text for '{}'", recipe.title);
                    return Ok(finish(ctx, recipe, og_image).await);
                }
                Err(e) => warn!("Page text of {} gave no recipe ({}): {}", url, e.code, e),
            }
        }
    }

    let text = ctx
        .search()
        .page_text(&url)
        .await?
        .ok_or_else(|| ExtractionError::no_recipe("No recipe found on this page").with_source_url(&url))?;
    let recipe = ctx.structure_text(&text, &url, Some(url.as_str())).await?;
    info!("Structured search result for '{}'", recipe.title);
    Ok(finish(ctx, recipe, None).await)
}

/// Parse the page once; the document does not outlive this call
fn read_page(url: &str, html: &str, max_chars: usize) -> PageReading {
    let context = ParsingContext::new(url, html);
    let markup = JsonLdExtractor.parse(&context);
    let metadata = MetadataExtractor.parse(&context);
    let text = if metadata.is_some() {
        extract_text(&context.document, max_chars)
    } else {
        String::new()
    };

    debug!(
        "Read {}: markup {}, metadata {}, {} chars of text",
        url,
        markup.is_some(),
        metadata.is_some(),
        text.len()
    );
    PageReading {
        markup,
        metadata,
        text,
    }
}

fn accept_markup(
    mut draft: RecipeDraft,
    metadata: Option<&PageMetadata>,
    url: &str,
) -> Result<ValidatedRecipe, ExtractionError> {
    if draft.description.trim().is_empty() {
        if let Some(description) = metadata.and_then(|m| m.description.clone()) {
            draft.description = description;
        }
    }
    draft.source_url = Some(url.to_string());
    validate(sanitize_draft(draft))
}

fn page_text_for(metadata: &PageMetadata, body: &str) -> String {
    let mut text = metadata.title.clone();
    if let Some(description) = &metadata.description {
        text.push('\n');
        text.push_str(description);
    }
    if !body.is_empty() {
        text.push_str("\n\n");
        text.push_str(body);
    }
    text
}

/// Attach a photo: markup images stay, then og:image, then a generated one
async fn finish(
    ctx: &PipelineContext,
    mut recipe: ValidatedRecipe,
    og_image: Option<String>,
) -> ValidatedRecipe {
    if !recipe.image_urls.is_empty() {
        return recipe;
    }
    if let Some(image) = og_image {
        if recipe.attach_image(image) {
            return recipe;
        }
    }
    ctx.generate_image(&mut recipe).await;
    recipe
}
