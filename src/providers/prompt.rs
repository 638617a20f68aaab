use serde_json::{json, Value};

/// Prompt used by the text normalizer.
///
/// Loaded from `prompt.txt` at compile time so it can be edited without
/// dealing with Rust string syntax.
pub const RECIPE_STRUCTURING_PROMPT: &str = include_str!("prompt.txt");

/// Literal the search prompts ask the model to answer with when it finds nothing
pub const NOT_FOUND_SENTINEL: &str = "ERROR";

const IMAGE_ANALYSIS_PROMPT: &str = "The attached photo shows a recipe: a cookbook page, a handwritten card, a screenshot or a plated dish. \
Read it and extract the recipe. If the photo only shows a finished dish, describe the most likely recipe for it. \
Put amounts and units in \"quantity\" and the ingredient itself in \"name\". Use 4 servings if unknown. \
Output only the JSON object.";

/// JSON schema shared by every structured-generation call
pub fn recipe_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "description": { "type": "string" },
            "servings": { "type": "integer" },
            "ingredients": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "quantity": { "type": "string" }
                    },
                    "required": ["name", "quantity"]
                }
            },
            "instructions": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["title", "description", "servings", "ingredients", "instructions"]
    })
}

/// Prompt for turning arbitrary text into a structured recipe
pub fn build_structuring_prompt(text: &str, source: &str) -> String {
    format!("{RECIPE_STRUCTURING_PROMPT}\nSource: {source}\n\nText:\n{text}")
}

/// Prompt asking a search-capable model for a page's recipe text
pub fn build_page_text_prompt(url: &str) -> String {
    format!(
        "Find the recipe published at {url}. Return only the recipe's text content: its title, \
a short description, the servings, the full ingredient list with quantities and every preparation step. \
Do not summarise or add commentary. If you cannot find a recipe at this address, respond with exactly {NOT_FOUND_SENTINEL}."
    )
}

/// Prompt asking a search-capable model for a video's transcript
pub fn build_transcript_prompt(url: &str) -> String {
    format!(
        "Find the captions or transcript of the video at {url}, together with its description box. \
Return the spoken recipe content as plain text, including every ingredient with its amount and every step in order. \
If the video has no captions or transcript you can access, respond with exactly {NOT_FOUND_SENTINEL}."
    )
}

pub fn image_analysis_prompt() -> &'static str {
    IMAGE_ANALYSIS_PROMPT
}

/// Prompt for a photo of the finished dish
pub fn build_image_prompt(title: &str, description: &str) -> String {
    format!(
        "A professional, appetizing food photograph of {title}. {description} \
Natural light, shallow depth of field, served on a simple plate, no text or watermarks."
    )
}
