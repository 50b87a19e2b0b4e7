//! Concept extraction strategies.
//!
//! Every strategy implements [`ConceptExtractor`]:
//!
//! - **Hybrid** ([`HybridExtractor`]): dictionary, regex patterns and keyword
//!   ranking, merged by max score, weighted, threshold-filtered.
//! - **Knowledge base** ([`KnowledgeBaseExtractor`]): domain detection, domain
//!   rules and a domain-scoped knowledge base with tiered fallbacks.
//! - **LLM** ([`LlmExtractor`]): any external [`LlmBackend`], passed through
//!   unmodified.
//!
//! Strategies are chosen at construction time via [`build_extractor`].

pub mod hybrid;
pub mod llm;
pub mod simulated;

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ExtractionConfig, LlmConfig, LlmProvider};
use crate::error::ConceptResult;
use crate::knowledge::Domain;
use crate::scoring::CandidateSource;

pub use hybrid::{HybridConfig, HybridExtractor};
pub use llm::{LlmBackend, LlmError, LlmExtractor};
pub use simulated::KnowledgeBaseExtractor;

/// A concept with the score and provenance behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptDetail {
    pub concept: String,
    pub confidence: f32,
    /// Detected domain, for strategies that detect one.
    pub domain: Option<Domain>,
    /// Source that produced the reported confidence.
    pub method: CandidateSource,
}

/// Point-in-time copy of an extractor's statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_questions: u64,
    pub concepts_extracted: u64,
    pub avg_concepts_per_question: f64,
}

/// Per-instance extraction counters.
///
/// Atomic so that one extractor can serve several worker threads.
#[derive(Debug, Default)]
pub struct ExtractionStats {
    questions: AtomicU64,
    concepts: AtomicU64,
}

impl ExtractionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one extraction call that counted `concepts` labels.
    pub fn record(&self, concepts: usize) {
        self.questions.fetch_add(1, Ordering::Relaxed);
        self.concepts.fetch_add(concepts as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let total_questions = self.questions.load(Ordering::Relaxed);
        let concepts_extracted = self.concepts.load(Ordering::Relaxed);
        let avg_concepts_per_question = if total_questions > 0 {
            concepts_extracted as f64 / total_questions as f64
        } else {
            0.0
        };
        StatsSnapshot {
            total_questions,
            concepts_extracted,
            avg_concepts_per_question,
        }
    }

    pub fn reset(&self) {
        self.questions.store(0, Ordering::Relaxed);
        self.concepts.store(0, Ordering::Relaxed);
    }
}

/// The concept extraction capability.
///
/// Extraction never fails: empty input yields an empty list and every
/// internal source failure is absorbed by the strategy.
pub trait ConceptExtractor: Send + Sync {
    /// Short strategy name for logs and reports.
    fn name(&self) -> &'static str;

    /// Ordered, duplicate-free concept labels for `text`.
    fn extract(&self, text: &str) -> Vec<String>;

    /// Concepts with their confidence and provenance.
    fn extract_with_confidence(&self, text: &str) -> Vec<ConceptDetail>;

    /// Cumulative statistics since the last reset.
    fn statistics(&self) -> StatsSnapshot;

    fn reset_statistics(&self);

    /// Extract concepts for a batch of texts, starting a fresh statistics run.
    ///
    /// Texts are processed in parallel; output order matches input order.
    fn extract_batch(&self, texts: &[String]) -> Vec<Vec<String>> {
        self.reset_statistics();
        let results: Vec<Vec<String>> = texts.par_iter().map(|t| self.extract(t)).collect();
        let stats = self.statistics();
        tracing::info!(
            extractor = self.name(),
            questions = stats.total_questions,
            concepts = stats.concepts_extracted,
            avg = stats.avg_concepts_per_question,
            "batch extraction complete"
        );
        results
    }
}

/// Which strategy a run should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Hybrid,
    Llm,
}

impl ExtractionMethod {
    pub fn from_use_llm(use_llm: bool) -> Self {
        if use_llm { Self::Llm } else { Self::Hybrid }
    }

    /// Human-readable description used in reports.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Hybrid => "Hybrid Extractor",
            Self::Llm => "Knowledge-Base Extractor",
        }
    }
}

/// Build the extractor for a run.
///
/// `Hybrid` loads `dictionary` (if given) with warnings on failure. `Llm`
/// selects the provider from `llm`: `simulated` is the knowledge-base
/// strategy; network providers are validated and reported unavailable.
pub fn build_extractor(
    method: ExtractionMethod,
    extraction: &ExtractionConfig,
    llm: &LlmConfig,
    dictionary: Option<&Path>,
) -> ConceptResult<Box<dyn ConceptExtractor>> {
    match method {
        ExtractionMethod::Hybrid => {
            let extractor = HybridExtractor::from_config(extraction, dictionary)?;
            Ok(Box::new(extractor))
        }
        ExtractionMethod::Llm => match llm.provider {
            LlmProvider::Simulated => {
                let extractor = KnowledgeBaseExtractor::from_config(extraction)?;
                Ok(Box::new(extractor))
            }
            provider => Err(llm::check_network_provider(provider, llm).into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_average_and_reset() {
        let stats = ExtractionStats::new();
        assert_eq!(stats.snapshot().avg_concepts_per_question, 0.0);
        stats.record(3);
        stats.record(0);
        stats.record(3);
        let snap = stats.snapshot();
        assert_eq!(snap.total_questions, 3);
        assert_eq!(snap.concepts_extracted, 6);
        assert_eq!(snap.avg_concepts_per_question, 2.0);
        stats.reset();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn factory_selects_strategy() {
        let extraction = ExtractionConfig::default();
        let llm = LlmConfig::default();
        let hybrid = build_extractor(ExtractionMethod::Hybrid, &extraction, &llm, None).unwrap();
        assert_eq!(hybrid.name(), "hybrid");
        let kb = build_extractor(ExtractionMethod::Llm, &extraction, &llm, None).unwrap();
        assert_eq!(kb.name(), "knowledge_base");
    }

    #[test]
    fn factory_rejects_network_providers() {
        let extraction = ExtractionConfig::default();
        let llm = LlmConfig {
            provider: LlmProvider::OpenAi,
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        let result = build_extractor(ExtractionMethod::Llm, &extraction, &llm, None);
        assert!(result.is_err());
    }
}
