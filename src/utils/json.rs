use crate::error::ExtractionError;
use serde_json::Value;

/// Remove a surrounding markdown code fence (```json ... ```), if any
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) on the opening line
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse a model response that is supposed to be a JSON document
pub fn parse_json_response(raw: &str) -> Result<Value, ExtractionError> {
    let body = strip_code_fences(raw);
    if body.is_empty() {
        return Err(ExtractionError::parsing("AI returned an empty response"));
    }
    serde_json::from_str(body).map_err(|e| {
        ExtractionError::parsing(format!("Could not parse AI response as JSON: {e}")).with_cause(e)
    })
}
