use log::{debug, error};
use recipe_extract::{ImageSource, PipelineConfig, RecipeImporter};
use std::env;
use std::process::ExitCode;

const USAGE: &str = "Usage: recipe-extract <url|youtube|image|text|probe> <input>";

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::init();

    // Mode and input from command-line arguments
    let args: Vec<String> = env::args().collect();
    let (Some(mode), Some(input)) = (args.get(1), args.get(2)) else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::from(2));
    };

    let config = PipelineConfig::load()?;
    debug!("{:#?}", config);
    let importer = RecipeImporter::builder().config(config).build()?;

    let result = match mode.as_str() {
        "url" => importer.extract_recipe_from_url(input).await,
        "youtube" => importer.generate_recipe_from_youtube_url(input).await,
        "image" => {
            let source = if input.starts_with("data:") {
                ImageSource::Base64(input.clone())
            } else {
                ImageSource::Path(input.clone())
            };
            importer.generate_recipe_from_image(&source).await
        }
        "text" => importer.generate_recipe_from_text(input).await,
        "probe" => {
            let reachable = importer.is_reachable(input).await;
            println!("{}", if reachable { "reachable" } else { "unreachable" });
            return Ok(if reachable {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
        _ => {
            eprintln!("Unknown mode '{mode}'. {USAGE}");
            return Ok(ExitCode::from(2));
        }
    };

    match result {
        Ok(recipe) => {
            println!("{}", serde_json::to_string_pretty(&recipe)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("{} ({})", e, e.code);
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
