//! Sanitizing and validating recipe drafts.
//!
//! Every extractor output goes through [`sanitize`] (or [`sanitize_draft`])
//! and then [`validate`], whichever tier produced it.

use crate::error::ExtractionError;
use crate::ingredients::split_ingredient;
use crate::model::{Ingredient, RecipeDraft, ValidatedRecipe, DEFAULT_SERVINGS};
use crate::utils::{is_image_url, is_web_url};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde_json::Value;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_INGREDIENTS: usize = 100;
pub const MAX_INSTRUCTIONS: usize = 50;

lazy_static! {
    static ref LEADING_INT_RE: Regex = Regex::new(r"\d+").unwrap();
}

/// First integer in a yield string such as "4 servings" or "Makes 12"
pub fn servings_from_text(text: &str) -> Option<u32> {
    LEADING_INT_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| *n > 0)
}

/// Coerce loosely-typed JSON (usually an AI answer) into a draft. Never fails.
pub fn sanitize(value: &Value) -> RecipeDraft {
    let draft = RecipeDraft {
        title: string_field(value, "title"),
        description: string_field(value, "description"),
        servings: servings_field(&value["servings"]),
        ingredients: value["ingredients"]
            .as_array()
            .map(|items| items.iter().filter_map(ingredient_from_value).collect())
            .unwrap_or_default(),
        instructions: value["instructions"]
            .as_array()
            .map(|items| items.iter().filter_map(instruction_from_value).collect())
            .unwrap_or_default(),
        image_urls: value["imageUrls"]
            .as_array()
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default(),
        source_url: value["sourceUrl"].as_str().map(str::to_string),
    };
    sanitize_draft(draft)
}

/// Canonicalize a typed draft: trim, drop empties, default servings.
pub fn sanitize_draft(draft: RecipeDraft) -> RecipeDraft {
    let mut image_urls: Vec<String> = Vec::new();
    for url in draft.image_urls {
        let url = url.trim().to_string();
        if !is_image_url(&url) {
            if !url.is_empty() {
                debug!("Dropping invalid image URL '{}'", url);
            }
            continue;
        }
        if !image_urls.contains(&url) {
            image_urls.push(url);
        }
    }

    RecipeDraft {
        title: draft.title.trim().to_string(),
        description: draft.description.trim().to_string(),
        servings: if draft.servings == 0 {
            DEFAULT_SERVINGS
        } else {
            draft.servings
        },
        ingredients: draft
            .ingredients
            .into_iter()
            .map(|i| Ingredient::new(i.name.trim(), i.quantity.trim()))
            .filter(|i| !i.name.is_empty())
            .collect(),
        instructions: draft
            .instructions
            .into_iter()
            .map(|step| step.trim().to_string())
            .filter(|step| !step.is_empty())
            .collect(),
        image_urls,
        source_url: draft
            .source_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty()),
    }
}

/// Check every schema rule and report all violations at once.
pub fn validate(draft: RecipeDraft) -> Result<ValidatedRecipe, ExtractionError> {
    let mut errors: Vec<String> = Vec::new();

    if draft.title.trim().is_empty() {
        errors.push("title: is required".to_string());
    } else if draft.title.chars().count() > MAX_TITLE_CHARS {
        errors.push(format!("title: must be at most {MAX_TITLE_CHARS} characters"));
    }

    if draft.description.trim().is_empty() {
        errors.push("description: is required".to_string());
    }

    if draft.servings == 0 {
        errors.push("servings: must be a positive number".to_string());
    }

    match draft.ingredients.len() {
        0 => errors.push("ingredients: at least one ingredient is required".to_string()),
        n if n > MAX_INGREDIENTS => errors.push(format!(
            "ingredients: at most {MAX_INGREDIENTS} ingredients are allowed, got {n}"
        )),
        _ => {}
    }
    for (i, ingredient) in draft.ingredients.iter().enumerate() {
        if ingredient.name.trim().is_empty() {
            errors.push(format!("ingredients[{i}].name: is required"));
        }
    }

    match draft.instructions.len() {
        0 => errors.push("instructions: at least one instruction is required".to_string()),
        n if n > MAX_INSTRUCTIONS => errors.push(format!(
            "instructions: at most {MAX_INSTRUCTIONS} instructions are allowed, got {n}"
        )),
        _ => {}
    }
    for (i, step) in draft.instructions.iter().enumerate() {
        if step.trim().is_empty() {
            errors.push(format!("instructions[{i}]: must not be empty"));
        }
    }

    for (i, url) in draft.image_urls.iter().enumerate() {
        if !is_image_url(url) {
            errors.push(format!("imageUrls[{i}]: is not a valid URL"));
        }
    }

    if let Some(url) = &draft.source_url {
        if !is_web_url(url) {
            errors.push("sourceUrl: is not a valid URL".to_string());
        }
    }

    if errors.is_empty() {
        Ok(ValidatedRecipe(draft))
    } else {
        debug!("Rejected draft '{}': {}", draft.title, errors.join(", "));
        let mut err = ExtractionError::validation(format!(
            "Recipe validation failed: {}",
            errors.join(", ")
        ));
        if let Some(url) = draft.source_url {
            err = err.with_source_url(url);
        }
        Err(err)
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value[key].as_str().map(str::trim).unwrap_or_default().to_string()
}

fn servings_field(value: &Value) -> u32 {
    let servings = match value {
        Value::Number(n) => n.as_f64().filter(|n| *n >= 1.0).map(|n| n.round() as u32),
        Value::String(s) => servings_from_text(s),
        _ => None,
    };
    servings.unwrap_or(DEFAULT_SERVINGS)
}

fn ingredient_from_value(value: &Value) -> Option<Ingredient> {
    match value {
        Value::String(s) => {
            let text = s.trim();
            (!text.is_empty()).then(|| split_ingredient(text))
        }
        Value::Object(_) => {
            let name = value["name"].as_str().map(str::trim).unwrap_or_default();
            if name.is_empty() {
                return None;
            }
            let quantity = match &value["quantity"] {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                _ => String::new(),
            };
            Some(Ingredient::new(name, quantity))
        }
        _ => None,
    }
}

fn instruction_from_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.as_str(),
        Value::Object(_) => value["text"].as_str().or(value["name"].as_str())?,
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
