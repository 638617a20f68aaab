use crate::error::ExtractionError;
use crate::providers::prompt::{build_structuring_prompt, recipe_schema};
use crate::providers::{AiBackend, StructuredRequest};
use crate::utils::{parse_json_response, with_deadline, with_retry, RetryPolicy};
use log::debug;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Turns free text (prose, transcripts, page text) into a loose recipe draft
/// through one structured-generation call.
pub struct TextNormalizer {
    backend: Arc<dyn AiBackend>,
    timeout: Duration,
    policy: RetryPolicy,
}

impl TextNormalizer {
    pub fn new(backend: Arc<dyn AiBackend>, timeout: Duration, policy: RetryPolicy) -> Self {
        Self {
            backend,
            timeout,
            policy,
        }
    }

    /// Structure `text` into JSON following the recipe schema.
    ///
    /// The result is not validated; run it through
    /// [`crate::validation::sanitize`] and [`crate::validation::validate`].
    pub async fn normalize(&self, text: &str, source: &str) -> Result<Value, ExtractionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractionError::no_recipe("There is no text to read a recipe from"));
        }

        let prompt = build_structuring_prompt(text, source);
        let schema = recipe_schema();
        let (prompt, schema) = (prompt.as_str(), &schema);
        debug!(
            "Normalizing {} chars from {} with {}",
            text.len(),
            source,
            self.backend.provider_name()
        );

        with_retry(&self.policy, || async move {
            let raw = with_deadline(
                self.timeout,
                "Structuring the recipe text timed out",
                self.backend
                    .generate_structured(StructuredRequest::text(prompt, schema)),
            )
            .await?;
            parse_json_response(&raw)
        })
        .await
    }
}
