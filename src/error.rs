//! Error types for the askfiles library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`AskFilesError`] — **Fatal**: the query cannot proceed at all (no
//!   document supplied, bytes that are not a decodable PDF, no model
//!   configured). Returned as `Err(AskFilesError)` from the top-level `ask*`
//!   functions. Decode-time failures are fail-fast: without a page image
//!   there is nothing to send to the model.
//!
//! * [`InferenceError`] — **Non-fatal**: a single page's model call failed
//!   (undecodable image bytes, transport error, malformed response). Never
//!   propagated past the inference client; converted into an
//!   [`crate::output::InferenceResult::Error`] of the shape
//!   `"Error processing image: {cause}"` so one bad page never aborts a
//!   multi-page batch.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the askfiles library.
///
/// Per-page inference failures use [`InferenceError`] and are stored in
/// [`crate::output::PageAnswer`] rather than propagated here.
#[derive(Debug, Error)]
pub enum AskFilesError {
    // ── Upload errors ─────────────────────────────────────────────────────
    /// The normalizer was invoked without a document.
    #[error("no document supplied")]
    MissingInput,

    /// The declared media type is not one of the supported upload types.
    #[error("Unsupported media type '{mime}'\nSupported: image/jpeg, image/png, image/webp, application/pdf")]
    UnsupportedMediaType { mime: String },

    // ── Input-resolution errors (CLI path/URL layer) ──────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── PDF decode errors ─────────────────────────────────────────────────
    /// The byte stream declared as PDF could not be parsed by pdfium.
    #[error("PDF is corrupt and cannot be decoded: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { detail: String },

    /// pdfium returned an error while rendering a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium and either place it next to the binary or\n\
set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Model errors ──────────────────────────────────────────────────────
    /// The configured vision model provider is not initialised (missing API key etc.).
    #[error("Vision model provider '{provider}' is not configured.\n{hint}")]
    ModelNotConfigured { provider: String, hint: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page's model invocation.
///
/// Swallowed at the inference-client boundary: callers receive it as the
/// `cause` inside an `"Error processing image: {cause}"` result string, or
/// can match on it directly via [`crate::pipeline::model::infer`].
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum InferenceError {
    /// The page bytes could not be decoded as an image.
    #[error("image decode failed: {detail}")]
    ImageDecode { detail: String },

    /// The canonical PNG form could not be produced.
    #[error("image encode failed: {detail}")]
    ImageEncode { detail: String },

    /// The remote model call failed (network, auth, malformed response).
    #[error("model call failed: {detail}")]
    Remote { detail: String },
}
