//! Streaming query API: emit page answers as they complete.
//!
//! The eager [`crate::query::ask`] returns only after every page has been
//! answered; for a thick notebook that can take a while. [`ask_stream`]
//! yields each [`PageAnswer`] as soon as its model call finishes, letting
//! callers render partial results immediately. Pages are still processed
//! one at a time, so answers always arrive in page order.

use crate::actions::Action;
use crate::config::QueryConfig;
use crate::document::UploadedDocument;
use crate::error::AskFilesError;
use crate::output::{InferenceResult, PageAnswer};
use crate::pipeline::{model, normalize};
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of page answers, in page order.
pub type AnswerStream = Pin<Box<dyn Stream<Item = PageAnswer> + Send>>;

/// Ask one action about every page, streaming answers as they are ready.
///
/// Normalization happens eagerly (so decode failures surface here as
/// `Err`); model calls happen lazily as the stream is polled, one page at
/// a time.
///
/// # Example
/// ```rust,no_run
/// use askfiles::{ask_stream, Action, MediaType, QueryConfig, UploadedDocument};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes = std::fs::read("notes.pdf")?;
/// let doc = UploadedDocument::new(bytes, MediaType::Pdf);
/// let config = QueryConfig::default();
/// let mut answers = ask_stream(&doc, &Action::ExtractText, &config).await?;
/// while let Some(answer) = answers.next().await {
///     println!("page {}: {}", answer.page_num, answer.result.as_str());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn ask_stream(
    doc: &UploadedDocument,
    action: &Action,
    config: &QueryConfig,
) -> Result<AnswerStream, AskFilesError> {
    info!(
        "Starting streaming query '{}' over '{}'",
        action.label(),
        doc.name()
    );

    let pages = normalize::normalize(Some(doc), config).await?;
    let vision_model = model::resolve_model(config)?;
    let instruction = action.instruction().into_owned();

    let s = stream::iter(pages.into_iter().enumerate()).then(move |(idx, page)| {
        let vision_model = Arc::clone(&vision_model);
        let instruction = instruction.clone();
        async move {
            let page_num = idx + 1;
            let start = Instant::now();
            let result =
                InferenceResult::from(model::infer(&vision_model, &instruction, &page).await);
            PageAnswer {
                page_num,
                result,
                duration_ms: start.elapsed().as_millis() as u64,
            }
        }
    });

    Ok(Box::pin(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MediaType;
    use crate::error::InferenceError;
    use crate::pipeline::model::VisionModel;
    use async_trait::async_trait;
    use edgequake_llm::ImageData;

    struct FixedModel(&'static str);

    #[async_trait]
    impl VisionModel for FixedModel {
        async fn generate(
            &self,
            _instruction: &str,
            _image: ImageData,
        ) -> Result<String, InferenceError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn stream_yields_one_answer_for_an_image_upload() {
        use image::{DynamicImage, Rgb, RgbImage};
        use std::io::Cursor;
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])))
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let doc = UploadedDocument::new(png, MediaType::Png);
        let config = QueryConfig::builder()
            .provider(Arc::new(FixedModel("transcribed")))
            .build()
            .unwrap();

        let answers: Vec<PageAnswer> = ask_stream(&doc, &Action::ExtractText, &config)
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].page_num, 1);
        assert_eq!(answers[0].result.as_str(), "transcribed");
    }

    #[tokio::test]
    async fn stream_reports_undecodable_image_per_page() {
        let config = QueryConfig::builder()
            .provider(Arc::new(FixedModel("unused")))
            .build()
            .unwrap();
        let doc = UploadedDocument::new(b"junk".to_vec(), MediaType::Jpeg);

        // Normalization succeeds for pass-through bytes; the decode error is
        // reported per page, in order.
        let answers: Vec<PageAnswer> = ask_stream(&doc, &Action::ExtractText, &config)
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(answers.len(), 1);
        assert!(answers[0].result.is_error());
    }
}
