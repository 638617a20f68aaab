use crate::error::ExtractionError;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;

lazy_static! {
    static ref SCHEME_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap();
}

/// Turn user input into a canonical absolute http(s) URL.
///
/// Input without a scheme gets `https://`. Normalizing an already
/// normalized URL returns it unchanged.
pub fn normalize_url(input: &str) -> Result<String, ExtractionError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::validation("url: must not be empty"));
    }

    let candidate = if SCHEME_RE.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&candidate).map_err(|e| {
        ExtractionError::validation(format!("url: '{trimmed}' is not a valid URL"))
            .with_source_url(trimmed)
            .with_cause(e)
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ExtractionError::validation(format!(
            "url: unsupported scheme '{}'",
            parsed.scheme()
        ))
        .with_source_url(trimmed));
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ExtractionError::validation("url: missing host").with_source_url(trimmed));
    }

    Ok(parsed.to_string())
}

/// True for absolute http(s) URLs with a host
pub fn is_web_url(value: &str) -> bool {
    Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// True for absolute http(s) URLs and `data:` URLs
pub fn is_image_url(value: &str) -> bool {
    if value.starts_with("data:") {
        return value.contains(',');
    }
    is_web_url(value)
}

/// Resolve a possibly relative image reference against the page it came from.
///
/// Absolute and `data:` URLs come back as they are. `None` when the result is
/// still not a usable image URL.
pub fn resolve_image_url(base: &str, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    if is_image_url(reference) {
        return Some(reference.to_string());
    }
    let resolved = Url::parse(base).and_then(|b| b.join(reference)).ok()?;
    let resolved = resolved.to_string();
    is_web_url(&resolved).then_some(resolved)
}
