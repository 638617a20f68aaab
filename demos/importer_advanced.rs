//! Advanced importer setup: explicit provider, custom image storage and
//! every input modality
//!
//! Run with OPENAI_API_KEY set.

use async_trait::async_trait;
use recipe_extract::{ImageData, ImageSource, ImageStore, LlmProvider, RecipeImporter};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

/// Writes photos to a directory served at images.example.com
struct LocalImageStore {
    dir: std::path::PathBuf,
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, image: &ImageData) -> Result<String, Box<dyn Error + Send + Sync>> {
        let extension = image.mime_type.rsplit('/').next().unwrap_or("png");
        let name = format!("recipe-{}.{}", image.bytes.len(), extension);
        tokio::fs::write(self.dir.join(&name), &image.bytes).await?;
        Ok(format!("https://images.example.com/{name}"))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let importer = RecipeImporter::builder()
        .provider(LlmProvider::OpenAI)
        .model("gpt-4.1-mini")
        .fetch_timeout(Duration::from_secs(10))
        .image_store(Arc::new(LocalImageStore {
            dir: std::env::temp_dir(),
        }))
        .build()?;

    println!("=== Text ===");
    let recipe = importer
        .generate_recipe_from_text(
            "Pancakes for two: 1 cup flour, 1 egg, 1 cup milk. Whisk everything, \
             then fry ladlefuls in a hot buttered pan until golden.",
        )
        .await?;
    println!("{}", serde_json::to_string_pretty(&recipe)?);

    println!("\n=== YouTube ===");
    match importer
        .generate_recipe_from_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .await
    {
        Ok(recipe) => println!("{} with photo {:?}", recipe.title, recipe.image_urls.first()),
        Err(e) => println!("No recipe ({}): {}", e.code, e),
    }

    if let Some(path) = std::env::args().nth(1) {
        println!("\n=== Image ===");
        let recipe = importer
            .generate_recipe_from_image(&ImageSource::Path(path))
            .await?;
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    }

    Ok(())
}
