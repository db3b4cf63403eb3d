//! The inference client: one model invocation per page image.
//!
//! [`VisionModel`] is the seam between the pipeline and the outside world:
//! the production implementation wraps an `edgequake_llm` provider, and
//! tests substitute a mock without touching the environment or the network.
//!
//! ## Failure policy
//!
//! [`infer`] never panics and never aborts a batch: any decode, transport,
//! or remote failure comes back as an [`InferenceError`], which the caller
//! maps to an `"Error processing image: …"` result at the boundary. There
//! is deliberately no retry and no timeout here — a failing page is simply
//! reported as part of the answer set.

use crate::config::QueryConfig;
use crate::document::PageImage;
use crate::error::{AskFilesError, InferenceError};
use crate::pipeline::encode;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider, ProviderFactory};
use std::sync::Arc;
use tracing::debug;

/// Default model when none is configured: cheap, fast, vision-capable.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-8b";

/// A multimodal model that answers one instruction about one image.
///
/// Implementations must be `Send + Sync`; they are shared via `Arc` across
/// the sequential page loop.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Generate text for `instruction` applied to `image`.
    ///
    /// The instruction may be empty — providers accept it and the model
    /// responds to the image alone.
    async fn generate(&self, instruction: &str, image: ImageData)
        -> Result<String, InferenceError>;
}

/// Production [`VisionModel`] backed by an `edgequake_llm` provider
/// (OpenAI, Anthropic, Gemini, Ollama, …).
pub struct EdgequakeModel {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
}

impl EdgequakeModel {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &QueryConfig) -> Self {
        Self {
            provider,
            options: CompletionOptions {
                temperature: Some(config.temperature),
                max_tokens: Some(config.max_tokens),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl VisionModel for EdgequakeModel {
    async fn generate(
        &self,
        instruction: &str,
        image: ImageData,
    ) -> Result<String, InferenceError> {
        // A single user turn carrying the instruction text and the page image.
        let messages = vec![ChatMessage::user_with_images(instruction, vec![image])];

        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| InferenceError::Remote {
                detail: format!("{}", e),
            })?;

        Ok(response.content)
    }
}

/// Run one inference for one page.
///
/// Canonicalises the page to a base64 PNG, then dispatches to the model.
/// Returns the model's generated text verbatim on success.
pub async fn infer(
    model: &Arc<dyn VisionModel>,
    instruction: &str,
    page: &PageImage,
) -> Result<String, InferenceError> {
    let image = encode::to_image_data(page)?;
    debug!("Dispatching inference ({} instruction bytes)", instruction.len());
    model.generate(instruction, image).await
}

/// Resolve the vision model, from most-specific to least-specific.
///
/// 1. **Pre-built model** (`config.provider`) — the caller constructed and
///    configured it entirely; used as-is. This is what tests use.
/// 2. **Named provider** (`config.provider_name`) — e.g. `"gemini"`; the
///    provider factory reads the matching API key from the environment.
/// 3. **Environment pair** (`ASKFILES_PROVIDER` + `ASKFILES_MODEL`) — a
///    provider and model chosen at the execution-environment level.
/// 4. **Gemini key** (`GEMINI_API_KEY`) — preferred when present, with
///    [`DEFAULT_MODEL`], since it is the provider this tool was built
///    around.
/// 5. **Full auto-detection** — the factory scans all known API key
///    variables and picks the first available provider.
pub fn resolve_model(config: &QueryConfig) -> Result<Arc<dyn VisionModel>, AskFilesError> {
    if let Some(ref model) = config.provider {
        return Ok(Arc::clone(model));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return create_vision_model(name, model, config);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("ASKFILES_PROVIDER"),
        std::env::var("ASKFILES_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_vision_model(&prov, &model, config);
        }
    }

    if let Ok(gemini_key) = std::env::var("GEMINI_API_KEY") {
        if !gemini_key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
            return create_vision_model("gemini", model, config);
        }
    }

    let (provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| AskFilesError::ModelNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No vision model provider could be auto-detected from environment.\n\
                Set GEMINI_API_KEY, OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(Arc::new(EdgequakeModel::new(provider, config)))
}

/// Instantiate a named provider with the given model and wrap it.
fn create_vision_model(
    provider_name: &str,
    model: &str,
    config: &QueryConfig,
) -> Result<Arc<dyn VisionModel>, AskFilesError> {
    let provider = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        AskFilesError::ModelNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })?;

    Ok(Arc::new(EdgequakeModel::new(provider, config)))
}
