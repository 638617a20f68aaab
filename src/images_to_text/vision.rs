use super::ImageData;
use crate::error::ExtractionError;
use crate::providers::prompt::{image_analysis_prompt, recipe_schema};
use crate::providers::{AiBackend, StructuredRequest};
use crate::utils::{parse_json_response, with_deadline, with_retry, RetryPolicy};
use log::debug;
use serde_json::Value;
use std::time::Duration;

/// Ask a vision-capable model to read a recipe off a photo.
///
/// Returns the loose JSON draft; sanitizing and validating it is up to the
/// caller. Each attempt runs under `timeout`.
pub async fn analyze_image(
    backend: &dyn AiBackend,
    image: &ImageData,
    timeout: Duration,
    policy: &RetryPolicy,
) -> Result<Value, ExtractionError> {
    let schema = recipe_schema();
    debug!(
        "Analyzing {} byte {} image with {}",
        image.bytes.len(),
        image.mime_type,
        backend.provider_name()
    );

    with_retry(policy, || async {
        let request = StructuredRequest::with_image(image_analysis_prompt(), &schema, image);
        let raw = with_deadline(
            timeout,
            "Image analysis timed out",
            backend.generate_structured(request),
        )
        .await?;
        parse_json_response(&raw)
    })
    .await
}
