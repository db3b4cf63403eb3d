//! Upload data model: media types, uploaded documents, and page images.
//!
//! Everything here is an immutable value object: an [`UploadedDocument`] is
//! created once at the upload boundary and only read afterwards, and a
//! [`PageSequence`] is produced once by the normalizer and consumed once by
//! the inference loop. No entity is mutated after creation, which is what
//! makes [`crate::pipeline::normalize::normalize`] trivially idempotent.

use crate::error::AskFilesError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared media type of an upload.
///
/// Dispatch in the normalizer is purely on this declared type — the bytes are
/// not sniffed. A mismatch between declared type and actual content surfaces
/// later: as [`AskFilesError::CorruptPdf`] for PDFs (eager) or as an
/// `"Error processing image: …"` result for images (lazy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Jpeg,
    Png,
    Webp,
    Pdf,
}

impl MediaType {
    /// Parse a MIME string as sent by an upload boundary.
    pub fn from_mime(mime: &str) -> Result<Self, AskFilesError> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(MediaType::Jpeg),
            "image/png" => Ok(MediaType::Png),
            "image/webp" => Ok(MediaType::Webp),
            "application/pdf" => Ok(MediaType::Pdf),
            other => Err(AskFilesError::UnsupportedMediaType {
                mime: other.to_string(),
            }),
        }
    }

    /// Infer the media type from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Result<Self, AskFilesError> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(MediaType::Jpeg),
            "png" => Ok(MediaType::Png),
            "webp" => Ok(MediaType::Webp),
            "pdf" => Ok(MediaType::Pdf),
            other => Err(AskFilesError::UnsupportedMediaType {
                mime: format!(".{other}"),
            }),
        }
    }

    /// The canonical MIME string for this type.
    pub fn as_mime(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Webp => "image/webp",
            MediaType::Pdf => "application/pdf",
        }
    }

    pub fn is_pdf(&self) -> bool {
        matches!(self, MediaType::Pdf)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// An uploaded file: opaque bytes plus the declared media type.
///
/// Immutable once constructed. The optional `name` is carried only for
/// display purposes (CLI output, log lines); it plays no role in dispatch.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    bytes: Vec<u8>,
    media_type: MediaType,
    name: Option<String>,
}

impl UploadedDocument {
    pub fn new(bytes: Vec<u8>, media_type: MediaType) -> Self {
        Self {
            bytes,
            media_type,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Display name for logs and CLI output.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("<upload>")
    }
}

/// A single page ready for one model invocation.
///
/// PDF pages arrive as decoded RGB rasters from pdfium; non-PDF uploads pass
/// through as their original encoded bytes and are decoded lazily by the
/// inference client.
#[derive(Clone)]
pub enum PageImage {
    /// A decoded RGB raster produced by the rasterizer.
    Raster(DynamicImage),
    /// Raw encoded bytes of a non-PDF upload, unvalidated.
    Encoded(Vec<u8>),
}

impl PageImage {
    /// Raster dimensions, if already decoded.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            PageImage::Raster(img) => Some((img.width(), img.height())),
            PageImage::Encoded(_) => None,
        }
    }
}

impl fmt::Debug for PageImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageImage::Raster(img) => f
                .debug_struct("Raster")
                .field("width", &img.width())
                .field("height", &img.height())
                .finish(),
            PageImage::Encoded(bytes) => f
                .debug_struct("Encoded")
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

impl PartialEq for PageImage {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PageImage::Raster(a), PageImage::Raster(b)) => a == b,
            (PageImage::Encoded(a), PageImage::Encoded(b)) => a == b,
            _ => false,
        }
    }
}

/// Ordered sequence of page images; order is display/report order.
///
/// One entry per PDF page (file order preserved), or a single entry for a
/// non-PDF upload. Empty only for zero-page PDFs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSequence {
    pages: Vec<PageImage>,
}

impl PageSequence {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PageImage> {
        self.pages.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageImage> {
        self.pages.iter()
    }
}

impl From<Vec<PageImage>> for PageSequence {
    fn from(pages: Vec<PageImage>) -> Self {
        Self { pages }
    }
}

impl IntoIterator for PageSequence {
    type Item = PageImage;
    type IntoIter = std::vec::IntoIter<PageImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.into_iter()
    }
}

impl<'a> IntoIterator for &'a PageSequence {
    type Item = &'a PageImage;
    type IntoIter = std::slice::Iter<'a, PageImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}
