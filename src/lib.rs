pub mod builder;
pub mod config;
pub mod error;
pub mod images_to_text;
pub mod ingredients;
pub mod media;
pub mod model;
pub mod pipelines;
pub mod providers;
pub mod url_to_text;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use builder::{LlmProvider, RecipeImporter, RecipeImporterBuilder};
pub use config::{load_config, PipelineConfig};
pub use error::{ErrorCode, ExtractionError, ImportError};
pub use images_to_text::{ImageData, ImageSource};
pub use media::ImageStore;
pub use model::{Ingredient, PageMetadata, RecipeDraft, ValidatedRecipe};
pub use providers::{AiBackend, StructuredRequest};
pub use validation::{sanitize, validate};
