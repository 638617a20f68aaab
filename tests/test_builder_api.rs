mod common;

use common::{pancake_json, FakeBackend};
use mockito::Matcher;
use recipe_extract::{ImportError, LlmProvider, RecipeImporter};
use serde_json::json;

#[test]
fn test_backend_and_provider_options_conflict() {
    let result = RecipeImporter::builder()
        .backend(FakeBackend::new())
        .provider(LlmProvider::OpenAI)
        .build();

    assert!(matches!(result, Err(ImportError::BuilderError(_))));
}

#[test]
fn test_custom_backend_needs_no_api_key() {
    let importer = RecipeImporter::builder()
        .backend(FakeBackend::new())
        .generate_images(false)
        .build()
        .unwrap();

    assert!(!importer.config().generate_images);
}

#[tokio::test]
async fn test_text_to_recipe_through_openai_api() {
    let mut server = mockito::Server::new_async().await;
    let completion = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({ "model": "gpt-4.1-mini" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{ "message": { "content": pancake_json() } }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let importer = RecipeImporter::builder()
        .provider(LlmProvider::OpenAI)
        .api_key("test-key")
        .base_url(server.url())
        .generate_images(false)
        .build()
        .unwrap();

    let recipe = importer
        .generate_recipe_from_text("Pancakes: 1 cup flour, 1 egg, 1 cup milk. Whisk and fry.")
        .await
        .unwrap();

    completion.assert_async().await;
    assert_eq!(recipe.title, "Pancakes");
    assert_eq!(recipe.ingredients.len(), 3);
}

#[tokio::test]
async fn test_openai_rate_limit_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let completion = server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_body(r#"{"error": {"message": "Rate limit reached"}}"#)
        .expect(2)
        .create_async()
        .await;

    let mut config = common::fast_config();
    config.generate_images = false;
    let importer = RecipeImporter::builder()
        .config(config)
        .provider(LlmProvider::OpenAI)
        .api_key("test-key")
        .base_url(server.url())
        .build()
        .unwrap();

    let err = importer
        .generate_recipe_from_text("Pancakes: flour, egg, milk.")
        .await
        .unwrap_err();

    completion.assert_async().await;
    assert_eq!(err.code, recipe_extract::ErrorCode::ApiLimit);
}

/// Needs GOOGLE_API_KEY and network access
#[tokio::test]
#[ignore]
async fn test_live_url_import() {
    let importer = RecipeImporter::builder().build().unwrap();
    let recipe = importer
        .extract_recipe_from_url("https://www.bbcgoodfood.com/recipes/classic-cottage-pie")
        .await
        .unwrap();

    assert!(!recipe.ingredients.is_empty());
    assert!(!recipe.instructions.is_empty());
}
