//! Extract a recipe from a web page and print it as JSON
//!
//! Needs GOOGLE_API_KEY (or a config.toml) for pages without recipe markup.

use recipe_extract::RecipeImporter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://www.bbcgoodfood.com/recipes/classic-cottage-pie".to_string());

    let importer = RecipeImporter::builder().build()?;
    let recipe = importer.extract_recipe_from_url(&url).await?;

    println!("{} (serves {})", recipe.title, recipe.servings);
    println!("Ingredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {} {}", ingredient.quantity, ingredient.name);
    }
    println!("\nInstructions:");
    for (i, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
    if let Some(image) = recipe.image_urls.first() {
        println!("\nPhoto: {}", image);
    }

    Ok(())
}
