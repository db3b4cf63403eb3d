//! # askfiles
//!
//! Ask questions about images and PDFs of your notes using vision language
//! models (VLMs).
//!
//! ## Why this crate?
//!
//! Handwritten and scanned notes defeat classic text extraction — OCR
//! engines garble formulas, diagrams, and messy handwriting. Instead this
//! crate normalises any upload (single image or multi-page PDF) into a
//! uniform sequence of page images, sends each page plus a natural-language
//! instruction to a multimodal model, and returns one answer per page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload (image | PDF)
//!  │
//!  ├─ 1. Normalize  dispatch on media type; PDFs rasterised via pdfium
//!  ├─ 2. Encode     canonical base64 PNG per page
//!  ├─ 3. Infer      one vision-model call per page, strictly in order
//!  └─ 4. Output     per-page text or "Error processing image: …"
//! ```
//!
//! A failing page never aborts the batch: inference errors are swallowed at
//! the client boundary and reported as part of the answer set. Decode
//! failures (a corrupt PDF) are fatal — there is nothing to send.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use askfiles::{ask, Action, MediaType, QueryConfig, UploadedDocument};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY / OPENAI_API_KEY / …
//!     let bytes = std::fs::read("notes.pdf")?;
//!     let doc = UploadedDocument::new(bytes, MediaType::Pdf).with_name("notes.pdf");
//!
//!     let config = QueryConfig::default();
//!     let output = ask(&doc, &Action::Ask("Extract Text".into()), &config).await?;
//!
//!     for answer in &output.answers {
//!         println!("── page {} ──\n{}", answer.page_num, answer.result.as_str());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `askfiles` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! askfiles = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod actions;
pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod query;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use actions::Action;
pub use config::{QueryConfig, QueryConfigBuilder};
pub use document::{MediaType, PageImage, PageSequence, UploadedDocument};
pub use error::{AskFilesError, InferenceError};
pub use output::{InferenceResult, PageAnswer, QueryOutput, QueryStats, DISCLAIMER};
pub use pipeline::model::{VisionModel, DEFAULT_MODEL};
pub use pipeline::normalize::normalize;
pub use progress::{NoopProgressCallback, ProgressCallback, QueryProgressCallback};
pub use query::{ask, ask_path, ask_sync};
pub use stream::{ask_stream, AnswerStream};
