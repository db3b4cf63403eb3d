//! Pipeline stages for document-to-answer processing.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. switch the rendering backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ normalize ──▶ encode ──▶ model
//! (path/URL) (dispatch +   (base64    (vision
//!   bytes)    rasterize)    PNG)       LLM)
//! ```
//!
//! 1. [`input`]     — resolve a path or URL to an in-memory upload (CLI layer)
//! 2. [`normalize`] — dispatch on media type; PDFs go through [`rasterize`]
//! 3. [`rasterize`] — render PDF pages via pdfium; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 4. [`encode`]    — canonicalise any page image to a base64 PNG for the
//!    multimodal API request body
//! 5. [`model`]     — the inference client; the only stage with network I/O

pub mod encode;
pub mod input;
pub mod model;
pub mod normalize;
pub mod rasterize;
