pub mod fetchers;
pub mod html;
pub mod search;
pub mod text;
pub mod youtube;

pub use search::SearchExtractor;
pub use text::TextNormalizer;
