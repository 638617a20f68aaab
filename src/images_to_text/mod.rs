mod vision;

pub use vision::analyze_image;

use crate::error::ExtractionError;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Represents the source of a recipe photo
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Image from a file path
    Path(String),
    /// Image as base64-encoded data, optionally as a full `data:` URL
    Base64(String),
    /// Raw bytes with a known MIME type
    Bytes { mime_type: String, data: Vec<u8> },
}

/// Image bytes together with their MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageData {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `data:<mime>;base64,<payload>`, usable directly as an image URL
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

impl ImageSource {
    /// Read the image into memory
    pub async fn load(&self) -> Result<ImageData, ExtractionError> {
        match self {
            ImageSource::Path(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    ExtractionError::validation(format!("image: could not read '{path}'"))
                        .with_cause(e)
                })?;
                Ok(ImageData::new(sniff_mime_type(&bytes), bytes))
            }
            ImageSource::Base64(data) => decode_base64_image(data),
            ImageSource::Bytes { mime_type, data } => {
                Ok(ImageData::new(mime_type.clone(), data.clone()))
            }
        }
    }
}

fn decode_base64_image(data: &str) -> Result<ImageData, ExtractionError> {
    let (declared_mime, payload) = match data.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest.split_once(',').ok_or_else(|| {
                ExtractionError::validation("image: malformed data URL")
            })?;
            let mime = header.trim_end_matches(";base64");
            (Some(mime.to_string()).filter(|m| !m.is_empty()), payload)
        }
        None => (None, data),
    };

    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(cleaned).map_err(|e| {
        ExtractionError::validation("image: invalid base64 data").with_cause(e)
    })?;
    if bytes.is_empty() {
        return Err(ExtractionError::validation("image: no image data"));
    }

    let mime = declared_mime.unwrap_or_else(|| sniff_mime_type(&bytes).to_string());
    Ok(ImageData::new(mime, bytes))
}

/// Guess the MIME type from the file signature; defaults to JPEG
fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        [_, _, _, _, b'f', b't', b'y', b'p', b'h', b'e', b'i', b'c', ..] => "image/heic",
        _ => "image/jpeg",
    }
}
