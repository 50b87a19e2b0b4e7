//! LLM-backed extraction.
//!
//! An [`LlmBackend`] is any component that can turn question text into
//! concepts. [`LlmExtractor`] adapts one to [`ConceptExtractor`] and returns
//! its output unmodified: no merging, weighting or threshold filter.

use miette::Diagnostic;
use thiserror::Error;

use super::{ConceptDetail, ConceptExtractor, ExtractionStats, StatsSnapshot};
use crate::config::{LlmConfig, LlmProvider};
use crate::scoring::CandidateSource;

#[derive(Debug, Error, Diagnostic)]
pub enum LlmError {
    #[error("LLM provider \"{provider}\" is not available in this build")]
    #[diagnostic(
        code(concepts::llm::provider_unavailable),
        help(
            "Network providers are not bundled. Set `llm.provider = \"simulated\"` to use the \
             knowledge-base extractor, or plug your own backend in through `LlmExtractor`."
        )
    )]
    ProviderUnavailable { provider: String },

    #[error("no API key for LLM provider \"{provider}\"")]
    #[diagnostic(
        code(concepts::llm::missing_api_key),
        help("Set `llm.api_key` in the config file or export {env_var}.")
    )]
    MissingApiKey { provider: String, env_var: String },
}

/// Result alias for LLM backends.
pub type LlmResult<T> = std::result::Result<T, LlmError>;

/// A concept with the backend's own confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConcept {
    pub concept: String,
    pub confidence: f32,
}

/// An external concept extraction capability.
pub trait LlmBackend: Send + Sync {
    fn extract_concepts(&self, text: &str) -> Vec<String>;

    fn extract_concepts_with_confidence(&self, text: &str) -> Vec<LlmConcept>;
}

/// Adapts an [`LlmBackend`] to the extractor interface.
#[derive(Debug)]
pub struct LlmExtractor<B> {
    backend: B,
    stats: ExtractionStats,
}

impl<B: LlmBackend> LlmExtractor<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            stats: ExtractionStats::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: LlmBackend> ConceptExtractor for LlmExtractor<B> {
    fn name(&self) -> &'static str {
        "llm"
    }

    fn extract(&self, text: &str) -> Vec<String> {
        let concepts = if text.trim().is_empty() {
            Vec::new()
        } else {
            self.backend.extract_concepts(text)
        };
        self.stats.record(concepts.len());
        concepts
    }

    fn extract_with_confidence(&self, text: &str) -> Vec<ConceptDetail> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.backend
            .extract_concepts_with_confidence(text)
            .into_iter()
            .map(|c| ConceptDetail {
                concept: c.concept,
                confidence: c.confidence,
                domain: None,
                method: CandidateSource::Llm,
            })
            .collect()
    }

    fn statistics(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    fn reset_statistics(&self) {
        self.stats.reset();
    }
}

/// The error for selecting a network provider: a missing key is reported
/// first, otherwise the provider is unavailable.
pub(crate) fn check_network_provider(provider: LlmProvider, config: &LlmConfig) -> LlmError {
    if config.resolved_api_key().is_none() {
        return LlmError::MissingApiKey {
            provider: provider.to_string(),
            env_var: provider.api_key_env().unwrap_or_default().to_string(),
        };
    }
    tracing::warn!(provider = %provider, model = %config.model, "network LLM providers are not bundled");
    LlmError::ProviderUnavailable {
        provider: provider.to_string(),
    }
}
