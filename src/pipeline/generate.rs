//! Generation: send the prompt and the ordered chart images to the vision
//! model and return its text.
//!
//! The call lives behind the narrow [`Generator`] trait so the orchestrator
//! can be driven with a recording fake in tests; [`VisionGenerator`] is the
//! production implementation over `edgequake-llm`.
//!
//! ## Message Layout
//!
//! A single user message carries the composed prompt text followed by all
//! chart attachments, in resource-list order: QPF 0–6, 6–12, 12–18, 18–24 hr,
//! surface chart last. The prompt references the charts positionally
//! ("0~6, 6~12, 12~18, 18~24 hr"), so that order is load-bearing.
//!
//! There is no local retry: a quota rejection or transport failure aborts
//! the run and the upstream message is surfaced verbatim.

use crate::config::BriefingConfig;
use crate::error::BriefError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider, ProviderFactory};
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::debug;

/// Environment variable holding the generation API key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Provider used when the config names none.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Vision model used when the config names none.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// One multimodal completion: prompt text plus ordered images in, text out.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str, charts: Vec<ImageData>) -> Result<String, BriefError>;
}

/// Production generator over an `edgequake-llm` provider.
pub struct VisionGenerator {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    max_tokens: usize,
    timeout_secs: u64,
}

impl VisionGenerator {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        temperature: f32,
        max_tokens: usize,
        timeout_secs: u64,
    ) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
            timeout_secs,
        }
    }
}

#[async_trait]
impl Generator for VisionGenerator {
    async fn generate(&self, prompt: &str, charts: Vec<ImageData>) -> Result<String, BriefError> {
        let messages = vec![ChatMessage::user_with_images(prompt, charts)];

        let options = CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        };

        let response = timeout(
            Duration::from_secs(self.timeout_secs),
            self.provider.chat(&messages, Some(&options)),
        )
        .await
        .map_err(|_| BriefError::Api {
            message: format!("timed out after {}s", self.timeout_secs),
        })?
        .map_err(|e| BriefError::Api {
            message: e.to_string(),
        })?;

        debug!(
            "Generation complete: {} input tokens, {} output tokens",
            response.prompt_tokens, response.completion_tokens
        );

        if response.content.trim().is_empty() {
            return Err(BriefError::Api {
                message: "model returned an empty response".to_string(),
            });
        }

        Ok(response.content)
    }
}

/// Resolve the generator, from most-specific to least-specific.
///
/// 1. **Pre-built generator** (`config.generator`) — the caller constructed
///    it entirely; used as-is. This is the test seam.
///
/// 2. **Provider from the environment** — the API key variable must be
///    present and non-empty *before* any network activity; the SDK factory
///    (which reads the same variable) then constructs the provider for the
///    configured or default model.
pub fn resolve_generator(config: &BriefingConfig) -> Result<Arc<dyn Generator>, BriefError> {
    if let Some(ref generator) = config.generator {
        return Ok(Arc::clone(generator));
    }

    match std::env::var(GEMINI_API_KEY_VAR) {
        Ok(key) if !key.is_empty() => {}
        _ => {
            return Err(BriefError::MissingCredential {
                var: GEMINI_API_KEY_VAR.to_string(),
            })
        }
    }

    let provider_name = config.provider_name.as_deref().unwrap_or(DEFAULT_PROVIDER);
    let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);

    let provider = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        BriefError::Api {
            message: format!("provider '{provider_name}' not available: {e}"),
        }
    })?;

    Ok(Arc::new(VisionGenerator::new(
        provider,
        config.temperature,
        config.max_tokens,
        config.api_timeout_secs,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedGenerator;

    #[async_trait]
    impl Generator for CannedGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _charts: Vec<ImageData>,
        ) -> Result<String, BriefError> {
            Ok("天氣型態：多雲時晴".to_string())
        }
    }

    #[test]
    fn injected_generator_bypasses_credential_check() {
        // An injected generator must resolve even with no key in the
        // environment — that is the whole point of the seam.
        std::env::remove_var(GEMINI_API_KEY_VAR);

        let config = BriefingConfig::builder()
            .generator(Arc::new(CannedGenerator))
            .build()
            .expect("valid config");

        assert!(resolve_generator(&config).is_ok());
    }

    #[test]
    fn missing_credential_is_reported_before_any_network_use() {
        std::env::remove_var(GEMINI_API_KEY_VAR);

        let config = BriefingConfig::builder().build().expect("valid config");
        let err = match resolve_generator(&config) {
            Ok(_) => panic!("must fail without a key"),
            Err(e) => e,
        };
        assert!(matches!(err, BriefError::MissingCredential { .. }), "got: {err}");
        assert!(err.to_string().contains(GEMINI_API_KEY_VAR));
    }
}
