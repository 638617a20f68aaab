use super::ParsingContext;
use crate::ingredients::split_ingredient;
use crate::model::{Ingredient, RecipeDraft, DEFAULT_SERVINGS};
use crate::utils::resolve_image_url;
use crate::validation::servings_from_text;
use html_escape::decode_html_entities;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use scraper::Selector;
use serde::Deserialize;
use serde_json::Value;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref BLANK_LINE_RE: Regex = Regex::new(r"\n[ \t\r]*\n").unwrap();
}

/// Reads schema.org `Recipe` records embedded as JSON-LD.
pub struct JsonLdExtractor;

impl JsonLdExtractor {
    /// First complete recipe in the page, scanning blocks in document order.
    ///
    /// A candidate needs a title, at least one ingredient and at least one
    /// instruction. Blocks that are not valid JSON, and candidates that are
    /// incomplete, are skipped. `None` means the page has no usable markup.
    pub fn parse(&self, context: &ParsingContext) -> Option<RecipeDraft> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);
        let selector = Selector::parse("script[type*='ld+json']").unwrap();

        let scripts: Vec<_> = context.document.select(&selector).collect();
        debug!(
            "JsonLdExtractor: Found {} JSON-LD script tags",
            scripts.len()
        );

        for (index, script) in scripts.iter().enumerate() {
            let raw_json: String = script.text().collect();
            let Some(json_ld) = parse_block(&raw_json) else {
                debug!("JsonLdExtractor: Skipping unparseable block {}", index);
                continue;
            };

            let mut candidates = Vec::new();
            collect_recipe_nodes(&json_ld, &mut candidates);
            debug!(
                "JsonLdExtractor: Block {} has {} recipe candidate(s)",
                index,
                candidates.len()
            );

            for candidate in candidates {
                match serde_json::from_value::<JsonLdRecipe>(candidate.clone()) {
                    Ok(recipe) => {
                        let draft = self.convert_to_draft(recipe, &context.url);
                        if is_complete(&draft) {
                            debug!("JsonLdExtractor: Accepted '{}'", draft.title);
                            return Some(draft);
                        }
                        debug!(
                            "JsonLdExtractor: Rejected incomplete candidate '{}' ({} ingredients, {} instructions)",
                            draft.title,
                            draft.ingredients.len(),
                            draft.instructions.len()
                        );
                    }
                    Err(e) => {
                        debug!("JsonLdExtractor: Failed to read candidate: {}", e);
                    }
                }
            }
        }

        debug!("JsonLdExtractor: No complete recipe found");
        None
    }

    fn convert_to_draft(&self, recipe: JsonLdRecipe, url: &str) -> RecipeDraft {
        let title = recipe
            .name
            .and_then(TextValue::into_text)
            .map(|t| clean_text(&t))
            .unwrap_or_default();

        let description = recipe
            .description
            .and_then(TextValue::into_text)
            .map(|d| clean_text(&d))
            .unwrap_or_default();

        let servings = recipe
            .recipe_yield
            .and_then(RecipeYield::servings)
            .unwrap_or(DEFAULT_SERVINGS);

        let ingredients = recipe
            .recipe_ingredient
            .or(recipe.ingredients)
            .map(RecipeIngredients::into_ingredients)
            .unwrap_or_default();

        let mut instructions = Vec::new();
        if let Some(recipe_instructions) = recipe.recipe_instructions {
            recipe_instructions.collect_steps(&mut instructions);
        }

        let image_urls = recipe
            .image
            .map(ImageType::into_urls)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|image| {
                let resolved = resolve_image_url(url, &image);
                if resolved.is_none() {
                    debug!("JsonLdExtractor: Dropping unusable image '{}'", image);
                }
                resolved
            })
            .collect();

        RecipeDraft {
            title,
            description,
            servings,
            ingredients,
            instructions,
            image_urls,
            source_url: Some(url.to_string()),
        }
    }
}

fn is_complete(draft: &RecipeDraft) -> bool {
    !draft.title.is_empty() && !draft.ingredients.is_empty() && !draft.instructions.is_empty()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonLdRecipe {
    name: Option<TextValue>,
    description: Option<TextValue>,
    image: Option<ImageType>,
    recipe_ingredient: Option<RecipeIngredients>,
    /// Legacy property name still used by some sites
    ingredients: Option<RecipeIngredients>,
    recipe_instructions: Option<RecipeInstructions>,
    recipe_yield: Option<RecipeYield>,
}

#[derive(Debug, Deserialize)]
struct TextObject {
    text: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextValue {
    String(String),
    Object(TextObject),
    Other(Value),
}

impl TextValue {
    fn into_text(self) -> Option<String> {
        match self {
            TextValue::String(s) => Some(s),
            TextValue::Object(obj) => obj.text.or(obj.name),
            TextValue::Other(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: Option<String>,
    #[serde(rename = "contentUrl")]
    content_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageItem {
    String(String),
    Object(ImageObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    String(String),
    Multiple(Vec<ImageItem>),
    Object(ImageObject),
    Other(Value),
}

impl ImageItem {
    fn into_url(self) -> Option<String> {
        match self {
            ImageItem::String(s) => Some(s),
            ImageItem::Object(obj) => obj.url.or(obj.content_url),
            ImageItem::Other(_) => None,
        }
    }
}

impl ImageType {
    fn into_urls(self) -> Vec<String> {
        let items = match self {
            ImageType::String(s) => vec![ImageItem::String(s)],
            ImageType::Object(obj) => vec![ImageItem::Object(obj)],
            ImageType::Multiple(items) => items,
            ImageType::Other(_) => Vec::new(),
        };

        let mut urls: Vec<String> = Vec::new();
        for url in items.into_iter().filter_map(ImageItem::into_url) {
            let url = decode_html_symbols(url.trim());
            if !url.is_empty() && !urls.contains(&url) {
                urls.push(url);
            }
        }
        urls
    }
}

#[derive(Debug, Deserialize)]
struct IngredientObject {
    name: Option<String>,
    text: Option<String>,
    amount: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngredientItem {
    String(String),
    Object(IngredientObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    Multiple(Vec<IngredientItem>),
    String(String),
    Other(Value),
}

impl RecipeIngredients {
    fn into_ingredients(self) -> Vec<Ingredient> {
        let items = match self {
            RecipeIngredients::Multiple(items) => items,
            RecipeIngredients::String(s) => s
                .lines()
                .map(|line| IngredientItem::String(line.to_string()))
                .collect(),
            RecipeIngredients::Other(_) => Vec::new(),
        };

        items
            .into_iter()
            .filter_map(|item| match item {
                IngredientItem::String(s) => {
                    let text = clean_text(&s);
                    (!text.is_empty()).then(|| split_ingredient(&text))
                }
                IngredientItem::Object(obj) => {
                    let name = clean_text(&obj.name.or(obj.text).unwrap_or_default());
                    let amount = clean_text(&obj.amount.unwrap_or_default());
                    if name.is_empty() {
                        None
                    } else if amount.is_empty() {
                        Some(split_ingredient(&name))
                    } else {
                        Some(Ingredient::new(name, amount))
                    }
                }
                IngredientItem::Other(_) => None,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstructionObject {
    text: Option<String>,
    name: Option<String>,
    item_list_element: Option<Vec<InstructionItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionItem {
    String(String),
    Nested(Vec<InstructionItem>),
    Object(InstructionObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeInstructions {
    String(String),
    Multiple(Vec<InstructionItem>),
    Single(InstructionObject),
    Other(Value),
}

impl RecipeInstructions {
    fn collect_steps(self, steps: &mut Vec<String>) {
        match self {
            RecipeInstructions::String(text) => push_paragraphs(&text, steps),
            RecipeInstructions::Multiple(items) => {
                items.into_iter().for_each(|item| item.collect_steps(steps))
            }
            RecipeInstructions::Single(obj) => obj.collect_steps(steps),
            RecipeInstructions::Other(_) => {}
        }
    }
}

impl InstructionItem {
    fn collect_steps(self, steps: &mut Vec<String>) {
        match self {
            InstructionItem::String(text) => push_step(&text, steps),
            InstructionItem::Nested(items) => {
                items.into_iter().for_each(|item| item.collect_steps(steps))
            }
            InstructionItem::Object(obj) => obj.collect_steps(steps),
            InstructionItem::Other(_) => {}
        }
    }
}

impl InstructionObject {
    fn collect_steps(self, steps: &mut Vec<String>) {
        // HowToSection: the section name is a heading, not a step
        if let Some(items) = self.item_list_element {
            items.into_iter().for_each(|item| item.collect_steps(steps));
            return;
        }
        // HowToStep: prefer text over name
        if let Some(text) = self.text.or(self.name) {
            push_step(&text, steps);
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeYield {
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Other(Value),
}

impl RecipeYield {
    fn servings(self) -> Option<u32> {
        match self {
            RecipeYield::Number(n) if n >= 1.0 => Some(n.round() as u32),
            RecipeYield::Number(_) => None,
            RecipeYield::String(s) => servings_from_text(&s),
            RecipeYield::Array(values) => values.iter().find_map(|v| match v {
                Value::Number(n) => n.as_f64().filter(|n| *n >= 1.0).map(|n| n.round() as u32),
                Value::String(s) => servings_from_text(s),
                _ => None,
            }),
            RecipeYield::Other(_) => None,
        }
    }
}

/// Split a single instruction string on blank lines
fn push_paragraphs(text: &str, steps: &mut Vec<String>) {
    let normalized = text.replace("\r\n", "\n");
    for paragraph in BLANK_LINE_RE.split(&normalized) {
        push_step(paragraph, steps);
    }
}

fn push_step(text: &str, steps: &mut Vec<String>) {
    let step = clean_text(text);
    if !step.is_empty() {
        steps.push(step);
    }
}

/// Decode entities, drop inline markup and collapse whitespace
fn clean_text(text: &str) -> String {
    let decoded = decode_html_symbols(text);
    let stripped = TAG_RE.replace_all(&decoded, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_html_symbols(text: &str) -> String {
    // for some reason need to decode twice to get the correct string
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

fn is_recipe_type(value: &Value) -> bool {
    fn matches_recipe(type_str: &str) -> bool {
        let local = type_str.rsplit(['/', ':']).next().unwrap_or(type_str);
        local.eq_ignore_ascii_case("recipe")
    }

    match value.get("@type") {
        Some(Value::String(type_str)) => matches_recipe(type_str),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(matches_recipe),
        _ => false,
    }
}

/// Depth-first collection of every Recipe node in a JSON-LD document:
/// bare objects, arrays, `@graph` containers and `mainEntity` wrappers
fn collect_recipe_nodes<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_recipe_nodes(item, out);
            }
        }
        Value::Object(map) => {
            if is_recipe_type(value) {
                out.push(value);
            }
            if let Some(graph) = map.get("@graph") {
                collect_recipe_nodes(graph, out);
            }
            if let Some(main_entity) = map.get("mainEntity") {
                collect_recipe_nodes(main_entity, out);
            }
        }
        _ => {}
    }
}

fn parse_block(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("JsonLdExtractor: Strict parse failed ({}), trying repair", e);
            serde_json::from_str::<Value>(&repair_json(trimmed)).ok()
        }
    }
}

/// Fix the two most common defects in hand-written JSON-LD: trailing commas
/// and raw line breaks inside string literals
fn repair_json(json_str: &str) -> String {
    let mut repaired = String::with_capacity(json_str.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in json_str.chars() {
        if in_string {
            match c {
                _ if escaped => {
                    escaped = false;
                    repaired.push(c);
                }
                '\\' => {
                    escaped = true;
                    repaired.push(c);
                }
                '"' => {
                    in_string = false;
                    repaired.push(c);
                }
                '\n' | '\r' | '\t' => repaired.push(' '),
                _ => repaired.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                repaired.push(c);
            }
            ']' | '}' => {
                // Drop a comma left before the closing bracket
                let trimmed_len = repaired.trim_end().len();
                if repaired[..trimmed_len].ends_with(',') {
                    repaired.truncate(trimmed_len - 1);
                }
                repaired.push(c);
            }
            _ => repaired.push(c),
        }
    }

    repaired
}
