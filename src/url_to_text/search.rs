use crate::error::ExtractionError;
use crate::providers::prompt::{build_page_text_prompt, build_transcript_prompt, NOT_FOUND_SENTINEL};
use crate::providers::AiBackend;
use crate::utils::{with_deadline, with_retry, RetryPolicy};
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

/// Shorter answers cannot be a real transcript
const MIN_TRANSCRIPT_CHARS: usize = 100;

/// Asks a search-augmented model for recipe text that could not be read
/// locally.
pub struct SearchExtractor {
    backend: Arc<dyn AiBackend>,
    page_text_timeout: Duration,
    transcript_timeout: Duration,
    policy: RetryPolicy,
}

impl SearchExtractor {
    pub fn new(
        backend: Arc<dyn AiBackend>,
        page_text_timeout: Duration,
        transcript_timeout: Duration,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            page_text_timeout,
            transcript_timeout,
            policy,
        }
    }

    /// Recipe text of the page at `url`, or `None` if the model found none.
    pub async fn page_text(&self, url: &str) -> Result<Option<String>, ExtractionError> {
        let prompt = build_page_text_prompt(url);
        let text = self
            .ask(&prompt, self.page_text_timeout, "Retrieving the page text timed out")
            .await
            .map_err(|e| e.with_source_url(url))?;

        if text.is_none() {
            info!("No recipe text found for {}", url);
        }
        Ok(text)
    }

    /// Caption or transcript text of the video at `url`.
    ///
    /// `None` when the model found nothing or returned something too short to
    /// be a transcript.
    pub async fn transcript(&self, url: &str) -> Result<Option<String>, ExtractionError> {
        let prompt = build_transcript_prompt(url);
        let text = self
            .ask(&prompt, self.transcript_timeout, "Retrieving the transcript timed out")
            .await
            .map_err(|e| e.with_source_url(url))?;

        Ok(text.filter(|t| {
            let long_enough = t.chars().count() >= MIN_TRANSCRIPT_CHARS;
            if !long_enough {
                info!("Transcript for {} is too short ({} chars)", url, t.chars().count());
            }
            long_enough
        }))
    }

    async fn ask(
        &self,
        prompt: &str,
        timeout: Duration,
        timeout_message: &str,
    ) -> Result<Option<String>, ExtractionError> {
        let raw = with_retry(&self.policy, || async move {
            let text = with_deadline(timeout, timeout_message, self.backend.search_text(prompt)).await?;
            if text.trim().is_empty() {
                return Err(ExtractionError::parsing("AI returned an empty response"));
            }
            Ok(text)
        })
        .await?;

        Ok(translate_sentinel(raw))
    }
}

fn translate_sentinel(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(NOT_FOUND_SENTINEL) {
        debug!("Search returned the not-found sentinel");
        None
    } else {
        Some(trimmed.to_string())
    }
}
