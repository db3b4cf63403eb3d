//! Upload normalization: turn a heterogeneous upload into a uniform
//! [`PageSequence`].
//!
//! Dispatch is purely on the declared media type. PDFs are eagerly
//! rasterised (decode failures here are fail-fast — without a page image
//! there is nothing to send downstream); every other supported type passes
//! through as its raw bytes, with decode validation deferred to the
//! inference client (fail-soft, reported per page).

use crate::config::QueryConfig;
use crate::document::{PageImage, PageSequence, UploadedDocument};
use crate::error::AskFilesError;
use crate::pipeline::rasterize;
use tracing::debug;

/// Normalize an upload into an ordered sequence of page images.
///
/// * `None` fails with [`AskFilesError::MissingInput`] before any decode
///   work begins.
/// * `application/pdf` delegates to the rasterizer; the sequence has one
///   entry per page in file order (empty for a zero-page document).
/// * Any image type yields exactly one [`PageImage::Encoded`] holding the
///   upload bytes unmodified.
///
/// Idempotent: the document is immutable, so calling this twice yields
/// equivalent sequences (rasterisation may be re-run; nothing is cached).
pub async fn normalize(
    doc: Option<&UploadedDocument>,
    config: &QueryConfig,
) -> Result<PageSequence, AskFilesError> {
    let doc = doc.ok_or(AskFilesError::MissingInput)?;

    if doc.media_type().is_pdf() {
        let rasters = rasterize::rasterize(doc.bytes().to_vec(), config.max_rendered_pixels).await?;
        debug!("Normalized '{}' → {} PDF pages", doc.name(), rasters.len());
        Ok(PageSequence::from(rasters))
    } else {
        debug!(
            "Normalized '{}' → 1 {} page (pass-through)",
            doc.name(),
            doc.media_type()
        );
        Ok(PageSequence::from(vec![PageImage::Encoded(
            doc.bytes().to_vec(),
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MediaType;

    #[tokio::test]
    async fn none_fails_with_missing_input() {
        let result = normalize(None, &QueryConfig::default()).await;
        assert!(matches!(result, Err(AskFilesError::MissingInput)));
    }

    #[tokio::test]
    async fn non_pdf_passes_bytes_through_untouched() {
        let bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x12, 0x34];
        let doc = UploadedDocument::new(bytes.clone(), MediaType::Jpeg);

        let seq = normalize(Some(&doc), &QueryConfig::default())
            .await
            .unwrap();

        assert_eq!(seq.len(), 1);
        assert_eq!(seq.get(0), Some(&PageImage::Encoded(bytes)));
    }

    #[tokio::test]
    async fn non_pdf_normalize_is_idempotent() {
        let doc = UploadedDocument::new(vec![1, 2, 3, 4], MediaType::Webp);
        let config = QueryConfig::default();

        let first = normalize(Some(&doc), &config).await.unwrap();
        let second = normalize(Some(&doc), &config).await.unwrap();

        assert_eq!(first, second);
    }

    // PDF dispatch is covered by the integration suite, which gates on a
    // locally available libpdfium.
}
