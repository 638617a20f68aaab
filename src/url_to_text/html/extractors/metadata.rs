use super::ParsingContext;
use crate::model::{PageMetadata, DEFAULT_SERVINGS};
use html_escape::decode_html_entities;
use log::debug;
use scraper::{Html, Selector};

/// Reads page-level title, description and image from meta tags.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// `None` when the page has no title at all.
    pub fn parse(&self, context: &ParsingContext) -> Option<PageMetadata> {
        let document = &context.document;

        let title = meta_content(document, "meta[property='og:title']")
            .or_else(|| element_text(document, "title"))?;

        let description = meta_content(document, "meta[property='og:description']")
            .or_else(|| meta_content(document, "meta[name='description']"));

        let image = meta_content(document, "meta[property='og:image']")
            .or_else(|| meta_content(document, "meta[name='og:image']"));

        debug!(
            "MetadataExtractor: title '{}' (description: {}, image: {}) for {}",
            title,
            description.is_some(),
            image.is_some(),
            context.url
        );

        Some(PageMetadata {
            title,
            description,
            servings: DEFAULT_SERVINGS,
            image,
        })
    }
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(clean)
        .find(|content| !content.is_empty())
}

fn element_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    document
        .select(&selector)
        .map(|el| clean(&el.text().collect::<String>()))
        .find(|text| !text.is_empty())
}

fn clean(text: &str) -> String {
    decode_html_entities(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
