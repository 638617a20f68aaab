mod common;

use common::{importer, is_structured, pancake_json, recipe_html, FakeBackend};
use recipe_extract::ValidatedRecipe;

async fn serve(json_ld: &str) -> (mockito::ServerGuard, mockito::Mock, String) {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/recipe")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(recipe_html(json_ld))
        .create_async()
        .await;
    let url = format!("{}/recipe", server.url());
    (server, mock, url)
}

async fn extract(backend: &std::sync::Arc<FakeBackend>, json_ld: &str) -> ValidatedRecipe {
    let (_server, _mock, url) = serve(json_ld).await;
    importer(backend).extract_recipe_from_url(&url).await.unwrap()
}

#[tokio::test]
async fn test_lowercase_recipe_type() {
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "recipe",
        "name": "Easy Black Bean Soup",
        "image": "https://example.com/blackbean.jpg",
        "description": "This black bean soup recipe is easy to make and full of flavor.",
        "recipeYield": "6",
        "recipeIngredient": [
            "2 cans black beans",
            "1 onion, diced",
            "4 cups vegetable broth",
            "Salt and pepper to taste"
        ],
        "recipeInstructions": [
            "Sauté onion and garlic until soft.",
            "Add beans and broth, simmer for 20 minutes.",
            "Season with salt and pepper."
        ]
    }"#;

    let backend = FakeBackend::new();
    let recipe = extract(&backend, json_ld).await;

    assert_eq!(recipe.title, "Easy Black Bean Soup");
    assert_eq!(recipe.servings, 6);
    assert_eq!(recipe.ingredients.len(), 4);
    assert_eq!(recipe.ingredients[3].name, "Salt and pepper to taste");
    assert_eq!(recipe.ingredients[3].quantity, "");
    assert_eq!(recipe.instructions.len(), 3);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_german_recipe_with_sections_and_array_yield() {
    let json_ld = r#"
    {
        "@type": "Recipe",
        "author": {"@type": "Person", "name": "Bianca Zapatka"},
        "description": "Saftige Schokoladen-Brownies treffen auf knusprige Chocolate Chip Cookies",
        "image": [
            "https://example.com/cookie-brownies.jpg",
            "https://example.com/cookie-brownies-500x500.jpg"
        ],
        "name": "Vegane Brookies - Chocolate Chip Cookie Brownies",
        "recipeYield": ["12", "12 Stück"],
        "recipeIngredient": [
            "160 g Mehl (Weizen-, Dinkel oder glutenfreies Mehl, gesiebt)",
            "30 g Kakaopulver",
            "1  Prise Salz"
        ],
        "recipeInstructions": [
            {
                "@type": "HowToSection",
                "name": "Brownie-Teig",
                "itemListElement": [
                    {"@type": "HowToStep", "text": "Den Backofen auf 180 °C Ober-/Unterhitze vorheizen."},
                    {"@type": "HowToStep", "text": "Vegane Butter mit der Schokolade schmelzen."}
                ]
            },
            {
                "@type": "HowToSection",
                "name": "Cookie-Teig",
                "itemListElement": [
                    {"@type": "HowToStep", "text": "Mehl, Zucker und Salz vermischen."}
                ]
            }
        ]
    }"#;

    let backend = FakeBackend::new();
    let recipe = extract(&backend, json_ld).await;

    assert_eq!(recipe.servings, 12);
    assert_eq!(recipe.ingredients.len(), 3);
    assert!(recipe.ingredients[0].name.contains("Mehl"));
    assert_eq!(
        recipe.instructions,
        vec![
            "Den Backofen auf 180 °C Ober-/Unterhitze vorheizen.",
            "Vegane Butter mit der Schokolade schmelzen.",
            "Mehl, Zucker und Salz vermischen."
        ]
    );
    assert_eq!(recipe.image_urls.len(), 2);
    assert!(!recipe.instructions.iter().any(|s| s.contains("Brownie-Teig")));
}

#[tokio::test]
async fn test_author_given_only_by_id() {
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@graph": [
            {"@type": "Person", "@id": "https://example.com/#/schema/person/1"},
            {
                "@type": ["Recipe", "NewsArticle"],
                "author": {"@id": "https://example.com/#/schema/person/1"},
                "name": "Dal Makhani",
                "description": "Creamy black lentils",
                "image": {"@type": "ImageObject", "url": "https://example.com/dal.jpg"},
                "recipeYield": 4,
                "recipeIngredient": ["500g whole black urad daal", "90ml double cream"],
                "recipeInstructions": [{"@type": "HowToStep", "text": "Soak the daal overnight."}]
            }
        ]
    }"#;

    let backend = FakeBackend::new();
    let recipe = extract(&backend, json_ld).await;

    assert_eq!(recipe.title, "Dal Makhani");
    assert_eq!(recipe.ingredients[0].quantity, "500g");
    assert_eq!(recipe.ingredients[1].name, "double cream");
    assert_eq!(recipe.image_urls, vec!["https://example.com/dal.jpg"]);
}

#[tokio::test]
async fn test_empty_description_hands_page_to_normalizer() {
    let json_ld = r#"
    {
        "@type": "Recipe",
        "description": "",
        "image": ["https://example.com/paneer.jpg"],
        "name": "Shahi Paneer",
        "recipeCuisine": [],
        "recipeIngredient": ["300g paneer", "4 roma tomatoes", "2 red onion"],
        "recipeInstructions": [{"@type": "HowToStep", "text": "Chop vegetables"}]
    }"#;

    let backend = FakeBackend::new();
    backend.answer_structured(Ok(pancake_json()));
    let recipe = extract(&backend, json_ld).await;

    assert_eq!(recipe.title, "Pancakes");
    assert_eq!(backend.count(is_structured), 1);
    assert!(backend.structured_prompts()[0].contains("Recipe Page"));
}

#[tokio::test]
async fn test_missing_ingredients_falls_through() {
    let json_ld = r#"
    {
        "@type": "Recipe",
        "name": "Mystery Dish",
        "description": "No ingredient list at all",
        "recipeInstructions": ["Cook it."]
    }"#;

    let backend = FakeBackend::new();
    backend.answer_structured(Ok(pancake_json()));
    let recipe = extract(&backend, json_ld).await;

    assert_eq!(recipe.title, "Pancakes");
    assert_eq!(backend.count(is_structured), 1);
}

#[tokio::test]
async fn test_missing_instructions_falls_through() {
    let json_ld = r#"
    {
        "@type": "Recipe",
        "name": "Half a Recipe",
        "description": "Ingredients only",
        "recipeIngredient": ["1 cup rice"]
    }"#;

    let backend = FakeBackend::new();
    backend.answer_structured(Ok(pancake_json()));
    let recipe = extract(&backend, json_ld).await;

    assert_eq!(recipe.title, "Pancakes");
    assert_eq!(backend.count(is_structured), 1);
}

#[tokio::test]
async fn test_relative_image_keeps_markup_tier() {
    let json_ld = r#"
    {
        "@type": "Recipe",
        "name": "Soup",
        "description": "Hot",
        "image": "/img/soup.jpg",
        "recipeIngredient": ["2 tomatoes"],
        "recipeInstructions": "Blend."
    }"#;

    let backend = FakeBackend::new();
    let (server, _mock, url) = serve(json_ld).await;
    let recipe = importer(&backend).extract_recipe_from_url(&url).await.unwrap();

    assert_eq!(recipe.title, "Soup");
    assert_eq!(recipe.image_urls, vec![format!("{}/img/soup.jpg", server.url())]);
    assert!(backend.calls().is_empty(), "unexpected AI calls: {:?}", backend.calls());
}
