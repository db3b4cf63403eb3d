//! Configuration for a query.
//!
//! All behaviour is controlled through [`QueryConfig`], built via its
//! [`QueryConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share configs across async tasks and to diff two runs to understand
//! why their outputs differ.
//!
//! Provider credentials are never read implicitly by the pipeline: either the
//! caller supplies a pre-built [`VisionModel`], or model resolution reads the
//! environment once at query start (see [`crate::pipeline::model`]). The
//! explicit-model arm is what keeps the core testable without environment
//! mutation.

use crate::error::AskFilesError;
use crate::pipeline::model::VisionModel;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Configuration for a document query.
///
/// Built via [`QueryConfig::builder()`] or [`QueryConfig::default()`].
///
/// # Example
/// ```rust
/// use askfiles::QueryConfig;
///
/// let config = QueryConfig::builder()
///     .model("gemini-1.5-flash-8b")
///     .provider_name("gemini")
///     .max_tokens(2048)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct QueryConfig {
    /// Maximum rendered page dimension (width or height) in pixels. Default: 2000.
    ///
    /// A render of an A0 poster could produce a 13 000 × 18 000 px image and
    /// exhaust memory. This caps either dimension, scaling the other
    /// proportionally, so pdfium never allocates more than roughly
    /// `max_rendered_pixels²` bytes of pixels.
    pub max_rendered_pixels: u32,

    /// Model identifier, e.g. "gemini-1.5-flash-8b", "gpt-4.1-nano".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// Provider name (e.g. "gemini", "openai", "anthropic", "ollama").
    /// If None along with `provider`, the model is auto-detected from the
    /// environment.
    pub provider_name: Option<String>,

    /// Pre-constructed vision model. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn VisionModel>>,

    /// Sampling temperature. Default: 0.1.
    ///
    /// Low temperature keeps the model faithful to what is actually on the
    /// page, which is what note transcription and Q&A want.
    pub temperature: f32,

    /// Maximum tokens the model may generate per page. Default: 4096.
    pub max_tokens: usize,

    /// Per-page progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_rendered_pixels: 2000,
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.1,
            max_tokens: 4096,
            progress_callback: None,
            download_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for QueryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryConfig")
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn VisionModel>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl QueryConfig {
    /// Create a new builder for `QueryConfig`.
    pub fn builder() -> QueryConfigBuilder {
        QueryConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`QueryConfig`].
pub struct QueryConfigBuilder {
    config: QueryConfig,
}

impl QueryConfigBuilder {
    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn VisionModel>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<QueryConfig, AskFilesError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(AskFilesError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if !(0.0..=2.0).contains(&c.temperature) {
            return Err(AskFilesError::InvalidConfig(format!(
                "temperature must be 0.0–2.0, got {}",
                c.temperature
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = QueryConfig::default();
        assert_eq!(config.max_rendered_pixels, 2000);
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.max_tokens, 4096);
        assert!(config.model.is_none());
        assert!(config.provider.is_none());
    }

    #[test]
    fn builder_clamps_values() {
        let config = QueryConfig::builder()
            .max_rendered_pixels(10)
            .temperature(5.0)
            .build()
            .unwrap();
        assert_eq!(config.max_rendered_pixels, 100);
        assert_eq!(config.temperature, 2.0);
    }

    #[test]
    fn builder_rejects_zero_max_tokens() {
        let result = QueryConfig::builder().max_tokens(0).build();
        assert!(matches!(result, Err(AskFilesError::InvalidConfig(_))));
    }

    #[test]
    fn builder_sets_model_and_provider_name() {
        let config = QueryConfig::builder()
            .model("gemini-1.5-flash-8b")
            .provider_name("gemini")
            .build()
            .unwrap();
        assert_eq!(config.model.as_deref(), Some("gemini-1.5-flash-8b"));
        assert_eq!(config.provider_name.as_deref(), Some("gemini"));
    }

    #[test]
    fn debug_does_not_dump_provider() {
        let config = QueryConfig::default();
        let dbg = format!("{:?}", config);
        assert!(dbg.contains("max_rendered_pixels"));
    }
}
