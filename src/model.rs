use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Servings used when a source does not say how many people a recipe feeds
pub const DEFAULT_SERVINGS: u32 = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Free-form amount such as "2 cups"; empty for "to taste" items
    #[serde(default)]
    pub quantity: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
        }
    }
}

/// A recipe produced by the pipeline, before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    /// Display order; index 0 is the primary photo
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            servings: DEFAULT_SERVINGS,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            image_urls: Vec::new(),
            source_url: None,
        }
    }
}

/// A draft that passed [`crate::validation::validate`].
///
/// Only validation can construct one, so holding a `ValidatedRecipe` is proof
/// that the schema rules hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidatedRecipe(pub(crate) RecipeDraft);

impl ValidatedRecipe {
    pub fn draft(&self) -> &RecipeDraft {
        &self.0
    }

    pub fn into_draft(self) -> RecipeDraft {
        self.0
    }

    /// Append an image, keeping the schema intact.
    ///
    /// Returns false (and leaves the recipe untouched) if `url` is not an
    /// http(s) or data URL.
    pub fn attach_image(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if !crate::utils::url::is_image_url(&url) {
            log::warn!("Dropping invalid image URL for '{}'", self.0.title);
            return false;
        }
        if !self.0.image_urls.contains(&url) {
            self.0.image_urls.push(url);
        }
        true
    }
}

impl Deref for ValidatedRecipe {
    type Target = RecipeDraft;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Page-level title/description found in meta tags.
///
/// This is not a recipe; it only tells the pipeline whether the page is worth
/// handing to the text normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: Option<String>,
    pub servings: u32,
    pub image: Option<String>,
}
