//! Result types returned by a query: per-page answers and aggregate stats.

use crate::error::InferenceError;
use serde::{Deserialize, Serialize};

/// Fixed disclaimer shown next to every answer by presentation layers.
///
/// This is display text only — it is never part of the model output.
pub const DISCLAIMER: &str =
    "Information provided may be inaccurate. Kindly consider double-checking the responses.";

/// The outcome of one model invocation: generated text or an error string.
///
/// Never both. The error string always has the exact shape
/// `"Error processing image: {cause}"` — the swallow-and-report policy that
/// lets a multi-page batch continue past individual failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InferenceResult {
    /// The model's generated text, verbatim — no post-processing,
    /// truncation, or content validation.
    Text(String),
    /// A textual error report for this page.
    Error(String),
}

impl InferenceResult {
    pub fn is_error(&self) -> bool {
        matches!(self, InferenceResult::Error(_))
    }

    /// The display text for this result, whichever side it is.
    pub fn as_str(&self) -> &str {
        match self {
            InferenceResult::Text(s) => s,
            InferenceResult::Error(s) => s,
        }
    }
}

impl From<Result<String, InferenceError>> for InferenceResult {
    fn from(result: Result<String, InferenceError>) -> Self {
        match result {
            Ok(text) => InferenceResult::Text(text),
            Err(cause) => InferenceResult::Error(format!("Error processing image: {cause}")),
        }
    }
}

/// The answer for a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageAnswer {
    /// 1-indexed page number within the upload.
    pub page_num: usize,
    /// Generated text or an `"Error processing image: …"` report.
    pub result: InferenceResult,
    /// Wall-clock duration of this page's model call.
    pub duration_ms: u64,
}

/// Everything produced by one query over one uploaded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutput {
    /// Per-page answers in page order.
    pub answers: Vec<PageAnswer>,
    /// Aggregate statistics for the run.
    pub stats: QueryStats,
}

/// Aggregate statistics for one query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryStats {
    /// Pages in the normalized sequence.
    pub total_pages: usize,
    /// Pages that produced generated text.
    pub answered_pages: usize,
    /// Pages that produced an error report.
    pub failed_pages: usize,
    /// Total wall-clock time for the query.
    pub total_duration_ms: u64,
    /// Time spent normalizing the upload (rasterization included).
    pub normalize_duration_ms: u64,
    /// Time spent in model calls.
    pub inference_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_maps_to_text_verbatim() {
        let result = InferenceResult::from(Ok("  raw model text\n".to_string()));
        assert_eq!(result, InferenceResult::Text("  raw model text\n".into()));
        assert!(!result.is_error());
    }

    #[test]
    fn err_maps_to_exact_error_shape() {
        let result = InferenceResult::from(Err(InferenceError::Remote {
            detail: "connection reset".into(),
        }));
        assert!(result.is_error());
        assert_eq!(
            result.as_str(),
            "Error processing image: model call failed: connection reset"
        );
        assert!(result.as_str().starts_with("Error processing image:"));
    }

    #[test]
    fn decode_err_maps_to_error_shape() {
        let result = InferenceResult::from(Err(InferenceError::ImageDecode {
            detail: "truncated JPEG".into(),
        }));
        assert!(result.as_str().starts_with("Error processing image:"));
        assert!(result.as_str().contains("truncated JPEG"));
    }

    #[test]
    fn query_output_serialises() {
        let output = QueryOutput {
            answers: vec![PageAnswer {
                page_num: 1,
                result: InferenceResult::Text("hello".into()),
                duration_ms: 12,
            }],
            stats: QueryStats {
                total_pages: 1,
                answered_pages: 1,
                ..Default::default()
            },
        };
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"page_num\":1"));
        let back: QueryOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.answers.len(), 1);
    }
}
