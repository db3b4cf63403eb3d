//! Eager query entry points: normalize an upload, then ask the model about
//! every page.
//!
//! Pages are processed strictly sequentially — one model call at a time, in
//! page order. Decode-time failures abort the query (fail-fast); inference
//! failures are recorded in the page's answer and processing continues
//! (fail-soft). The asymmetry is deliberate: decoding a page is necessary to
//! have anything to send, while a failed model call is itself part of the
//! answer set presented to the user.

use crate::actions::Action;
use crate::config::QueryConfig;
use crate::document::UploadedDocument;
use crate::error::AskFilesError;
use crate::output::{InferenceResult, PageAnswer, QueryOutput, QueryStats};
use crate::pipeline::{input, model, normalize};
use std::time::Instant;
use tracing::{info, warn};

/// Ask one action about every page of an uploaded document.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(QueryOutput)` with one [`PageAnswer`] per page, in page order, even
/// if some pages failed (check `output.stats.failed_pages`). A zero-page
/// PDF yields an empty answer set.
///
/// # Errors
/// Returns `Err(AskFilesError)` only for fatal errors: missing document,
/// undecodable PDF, no model configured.
pub async fn ask(
    doc: &UploadedDocument,
    action: &Action,
    config: &QueryConfig,
) -> Result<QueryOutput, AskFilesError> {
    let total_start = Instant::now();
    info!("Starting query '{}' over '{}'", action.label(), doc.name());

    // ── Step 1: Normalize the upload ─────────────────────────────────────
    let normalize_start = Instant::now();
    let pages = normalize::normalize(Some(doc), config).await?;
    let normalize_duration_ms = normalize_start.elapsed().as_millis() as u64;
    info!(
        "Normalized '{}' → {} pages in {}ms",
        doc.name(),
        pages.len(),
        normalize_duration_ms
    );

    // ── Step 2: Resolve the model ────────────────────────────────────────
    let vision_model = model::resolve_model(config)?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_query_start(pages.len());
    }

    // ── Step 3: One inference per page, strictly in order ────────────────
    let inference_start = Instant::now();
    let total_pages = pages.len();
    let instruction = action.instruction();
    let mut answers = Vec::with_capacity(total_pages);

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total_pages);
        }

        let page_start = Instant::now();
        let result =
            InferenceResult::from(model::infer(&vision_model, instruction.as_ref(), page).await);
        let duration_ms = page_start.elapsed().as_millis() as u64;

        if let Some(ref cb) = config.progress_callback {
            match &result {
                InferenceResult::Text(text) => cb.on_page_complete(page_num, total_pages, text.len()),
                InferenceResult::Error(msg) => cb.on_page_error(page_num, total_pages, msg),
            }
        }
        if let InferenceResult::Error(ref msg) = result {
            warn!("Page {}: {}", page_num, msg);
        }

        answers.push(PageAnswer {
            page_num,
            result,
            duration_ms,
        });
    }
    let inference_duration_ms = inference_start.elapsed().as_millis() as u64;

    // ── Step 4: Compute stats ────────────────────────────────────────────
    let answered = answers.iter().filter(|a| !a.result.is_error()).count();
    let failed = answers.len() - answered;

    if let Some(ref cb) = config.progress_callback {
        cb.on_query_complete(total_pages, answered);
    }

    let stats = QueryStats {
        total_pages,
        answered_pages: answered,
        failed_pages: failed,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        normalize_duration_ms,
        inference_duration_ms,
    };

    info!(
        "Query complete: {}/{} pages answered, {}ms total",
        answered, total_pages, stats.total_duration_ms
    );

    Ok(QueryOutput { answers, stats })
}

/// Resolve a local file path or HTTP/HTTPS URL and ask about it.
///
/// The media type is classified by extension (local files) or Content-Type
/// (URLs); URL bodies are downloaded into memory first.
pub async fn ask_path(
    input_str: impl AsRef<str>,
    action: &Action,
    config: &QueryConfig,
) -> Result<QueryOutput, AskFilesError> {
    let doc = input::resolve_input(input_str.as_ref(), config.download_timeout_secs).await?;
    ask(&doc, action, config).await
}

/// Synchronous wrapper around [`ask`].
///
/// Creates a temporary tokio runtime internally.
pub fn ask_sync(
    doc: &UploadedDocument,
    action: &Action,
    config: &QueryConfig,
) -> Result<QueryOutput, AskFilesError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| AskFilesError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(ask(doc, action, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MediaType;
    use crate::error::InferenceError;
    use crate::pipeline::model::VisionModel;
    use async_trait::async_trait;
    use edgequake_llm::ImageData;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct EchoModel {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VisionModel for EchoModel {
        async fn generate(
            &self,
            instruction: &str,
            _image: ImageData,
        ) -> Result<String, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("echo: {instruction}"))
        }
    }

    fn png_upload() -> UploadedDocument {
        use image::{DynamicImage, Rgb, RgbImage};
        use std::io::Cursor;
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, Rgb([9, 9, 9])))
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        UploadedDocument::new(png, MediaType::Png).with_name("notes.png")
    }

    fn config_with(model: Arc<dyn VisionModel>) -> QueryConfig {
        QueryConfig::builder().provider(model).build().unwrap()
    }

    #[tokio::test]
    async fn single_image_yields_one_answer() {
        let model = Arc::new(EchoModel {
            calls: AtomicUsize::new(0),
        });
        let config = config_with(model.clone());

        let output = ask(&png_upload(), &Action::Ask("what is this?".into()), &config)
            .await
            .unwrap();

        assert_eq!(output.answers.len(), 1);
        assert_eq!(output.stats.total_pages, 1);
        assert_eq!(output.stats.answered_pages, 1);
        assert_eq!(output.stats.failed_pages, 0);
        assert_eq!(
            output.answers[0].result,
            crate::output::InferenceResult::Text("echo: what is this?".into())
        );
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_instruction_still_issues_one_call() {
        let model = Arc::new(EchoModel {
            calls: AtomicUsize::new(0),
        });
        let config = config_with(model.clone());

        let output = ask(&png_upload(), &Action::Ask(String::new()), &config)
            .await
            .unwrap();

        assert_eq!(output.answers.len(), 1);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn undecodable_image_is_reported_not_fatal() {
        let model = Arc::new(EchoModel {
            calls: AtomicUsize::new(0),
        });
        let config = config_with(model.clone());
        let doc = UploadedDocument::new(b"not an image".to_vec(), MediaType::Jpeg);

        let output = ask(&doc, &Action::ExtractText, &config).await.unwrap();

        assert_eq!(output.answers.len(), 1);
        assert_eq!(output.stats.failed_pages, 1);
        assert!(output.answers[0]
            .result
            .as_str()
            .starts_with("Error processing image:"));
        // The model was never reached: the bytes failed to decode.
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ask_path_rejects_missing_file() {
        let model: Arc<dyn VisionModel> = Arc::new(EchoModel {
            calls: AtomicUsize::new(0),
        });
        let config = config_with(model);

        let result = ask_path("/no/such/notes.pdf", &Action::ExtractText, &config).await;
        assert!(matches!(result, Err(AskFilesError::FileNotFound { .. })));
    }

    #[test]
    fn ask_sync_runs_without_an_ambient_runtime() {
        let model: Arc<dyn VisionModel> = Arc::new(EchoModel {
            calls: AtomicUsize::new(0),
        });
        let config = config_with(model);

        let output = ask_sync(&png_upload(), &Action::CollectFormulas, &config).unwrap();
        assert_eq!(output.answers.len(), 1);
    }
}
