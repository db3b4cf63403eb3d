//! PDF rasterisation: render every page to an RGB raster via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a dedicated thread pool
//! thread designed for blocking operations, preventing the Tokio worker
//! threads from stalling during CPU-heavy rendering.
//!
//! ## Failure semantics
//!
//! A byte stream that pdfium cannot parse fails the whole call with
//! [`AskFilesError::CorruptPdf`] — the caller never sees partial results.
//! All pdfium state (document handle, page bitmaps) lives inside the
//! blocking closure and is released on every exit path, including errors.

use crate::document::PageImage;
use crate::error::AskFilesError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info};

/// Rasterise every page of a PDF byte stream, in file order.
///
/// The caller guarantees the bytes were already classified as PDF; this
/// still fails cleanly when they are not decodable. A zero-page document
/// yields an empty vector, not an error.
///
/// `max_pixels` caps the longest rendered edge so poster-size pages cannot
/// exhaust memory.
pub async fn rasterize(
    pdf_bytes: Vec<u8>,
    max_pixels: u32,
) -> Result<Vec<PageImage>, AskFilesError> {
    tokio::task::spawn_blocking(move || rasterize_blocking(&pdf_bytes, max_pixels))
        .await
        .map_err(|e| AskFilesError::Internal(format!("Rasterise task panicked: {}", e)))?
}

/// Blocking implementation of page rasterisation.
fn rasterize_blocking(pdf_bytes: &[u8], max_pixels: u32) -> Result<Vec<PageImage>, AskFilesError> {
    let pdfium = Pdfium::new(bind_pdfium()?);

    let document = pdfium
        .load_pdf_from_byte_slice(pdf_bytes, None)
        .map_err(|e| AskFilesError::CorruptPdf {
            detail: format!("{:?}", e),
        })?;

    let pages = document.pages();
    let page_count = pages.len() as usize;
    info!("PDF loaded: {} pages", page_count);

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let mut rasters = Vec::with_capacity(page_count);

    for idx in 0..page_count {
        let page = pages
            .get(idx as u16)
            .map_err(|e| AskFilesError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;

        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| AskFilesError::RasterisationFailed {
                    page: idx + 1,
                    detail: format!("{:?}", e),
                })?;

        // pdfium hands back RGBA; pages are opaque so RGB is the canonical form.
        let image = DynamicImage::ImageRgb8(bitmap.as_image().to_rgb8());
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );

        rasters.push(PageImage::Raster(image));
    }

    Ok(rasters)
}

/// Bind to a pdfium library: `PDFIUM_LIB_PATH`, then the executable's
/// directory, then the system library path.
fn bind_pdfium() -> Result<Box<dyn PdfiumLibraryBindings>, AskFilesError> {
    if let Ok(path) = std::env::var("PDFIUM_LIB_PATH") {
        if !path.is_empty() {
            return Pdfium::bind_to_library(&path)
                .map_err(|e| AskFilesError::PdfiumBindingFailed(format!("{:?}", e)));
        }
    }

    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| AskFilesError::PdfiumBindingFailed(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// pdfium is an optional native library; skip raster tests when it is
    /// not installed on the machine running the suite.
    fn pdfium_available() -> bool {
        bind_pdfium().is_ok()
    }

    #[tokio::test]
    async fn corrupt_bytes_fail_with_corrupt_pdf() {
        if !pdfium_available() {
            eprintln!("SKIP — libpdfium not available");
            return;
        }

        let result = rasterize(b"definitely not a pdf".to_vec(), 2000).await;
        assert!(matches!(result, Err(AskFilesError::CorruptPdf { .. })));
    }

    #[tokio::test]
    async fn empty_bytes_fail_with_corrupt_pdf() {
        if !pdfium_available() {
            eprintln!("SKIP — libpdfium not available");
            return;
        }

        let result = rasterize(Vec::new(), 2000).await;
        assert!(matches!(result, Err(AskFilesError::CorruptPdf { .. })));
    }
}
