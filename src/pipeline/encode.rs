//! Canonical image form: any [`PageImage`] → base64 PNG [`ImageData`].
//!
//! Multimodal APIs (OpenAI, Anthropic, Gemini) accept images as base64
//! data-URIs embedded in the JSON request body. Every page is normalised to
//! one canonical in-memory form before dispatch: rasters are PNG-encoded
//! directly, and raw upload bytes are decoded first (this is where a
//! malformed image upload finally surfaces, as a per-page
//! [`InferenceError`] rather than a fatal error). PNG is chosen over JPEG
//! because it is lossless — text crispness matters far more than file size
//! for reading handwritten notes.

use crate::document::PageImage;
use crate::error::InferenceError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Canonicalise a page image for the multimodal API request body.
///
/// `detail: "high"` instructs GPT-4-class models to use the full image tile
/// budget; without it fine print and small handwriting are lost.
pub fn to_image_data(page: &PageImage) -> Result<ImageData, InferenceError> {
    match page {
        PageImage::Raster(img) => encode_png(img),
        PageImage::Encoded(bytes) => {
            let img = image::load_from_memory(bytes).map_err(|e| InferenceError::ImageDecode {
                detail: e.to_string(),
            })?;
            encode_png(&img)
        }
    }
}

/// Encode a decoded raster as a base64 PNG.
fn encode_png(img: &DynamicImage) -> Result<ImageData, InferenceError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| InferenceError::ImageEncode {
            detail: e.to_string(),
        })?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded image → {} bytes base64", b64.len());

    Ok(ImageData::new(b64, "image/png").with_detail("high"))
}
