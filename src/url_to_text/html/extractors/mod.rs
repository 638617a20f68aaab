use scraper::Html;

mod json_ld;
mod metadata;

pub use json_ld::JsonLdExtractor;
pub use metadata::MetadataExtractor;

/// A fetched page ready for the structured-data extractors
pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}
