//! Knowledge-base strategy.
//!
//! Detects the question's domain, runs the domain rule table and looks up the
//! detected domain's knowledge base. Needs no external service, so it doubles
//! as the offline stand-in for an LLM backend.

use std::collections::HashSet;

use super::{ConceptDetail, ConceptExtractor, ExtractionStats, StatsSnapshot};
use crate::config::ExtractionConfig;
use crate::error::{ConceptResult, PatternResult};
use crate::knowledge::{detect_domain, Domain, KnowledgeBase};
use crate::patterns::PatternSet;
use crate::scoring::{merge_by_max, Candidate, CandidateSource, ScoredConcept};
use crate::text::word_coverage;

const MAX_CONCEPTS: usize = 5;
/// Concepts must score strictly above this to be selected.
const SELECT_CUTOFF: f32 = 0.6;
const FALLBACK_COUNT: usize = 3;
const KB_BASE: f32 = 0.4;
const KB_SPAN: f32 = 0.5;
const KB_CAP: f32 = 0.9;

/// Domain-aware extractor backed by rule tables and a knowledge base.
#[derive(Debug)]
pub struct KnowledgeBaseExtractor {
    patterns: PatternSet,
    knowledge: KnowledgeBase,
    stats: ExtractionStats,
}

/// Everything one call computes before selection.
struct Analysis {
    domain: Domain,
    ranked: Vec<ScoredConcept>,
    pattern_labels: HashSet<String>,
}

impl KnowledgeBaseExtractor {
    pub fn new(knowledge: KnowledgeBase) -> PatternResult<Self> {
        Ok(Self {
            patterns: PatternSet::domain_rules()?,
            knowledge,
            stats: ExtractionStats::new(),
        })
    }

    /// The built-in rule table and knowledge base.
    pub fn builtin() -> PatternResult<Self> {
        Self::new(KnowledgeBase::builtin())
    }

    /// Use the configured knowledge base file, or the built-in content.
    pub fn from_config(config: &ExtractionConfig) -> ConceptResult<Self> {
        let knowledge = match &config.knowledge_base_file {
            Some(path) => {
                let kb = KnowledgeBase::load(path)?;
                tracing::info!(path = %path.display(), concepts = kb.concept_count(), "loaded knowledge base");
                kb
            }
            None => KnowledgeBase::builtin(),
        };
        Ok(Self::new(knowledge)?)
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Detect the domain of `text`.
    pub fn domain(&self, text: &str) -> Domain {
        detect_domain(&text.to_lowercase())
    }

    fn knowledge_candidates(&self, text_lower: &str, domain: Domain) -> Vec<Candidate> {
        let mut out = Vec::new();
        for category in self.knowledge.categories(domain) {
            for concept in &category.concepts {
                let (matched, total) = word_coverage(&concept.to_lowercase(), text_lower);
                if matched == 0 {
                    continue;
                }
                let fraction = matched as f32 / total as f32;
                out.push(Candidate::new(
                    concept.clone(),
                    KB_CAP.min(KB_BASE + fraction * KB_SPAN),
                    CandidateSource::KnowledgeBase,
                ));
            }
        }
        out
    }

    fn analyze(&self, text: &str) -> Analysis {
        let text_lower = text.to_lowercase();
        let domain = detect_domain(&text_lower);
        let pattern_candidates = self.patterns.candidates(&text_lower);
        let pattern_labels = pattern_candidates.iter().map(|c| c.concept.clone()).collect();
        let kb_candidates = self.knowledge_candidates(&text_lower, domain);
        let ranked = merge_by_max(pattern_candidates.into_iter().chain(kb_candidates));
        Analysis {
            domain,
            ranked,
            pattern_labels,
        }
    }

    fn select(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let Analysis { domain, ranked, .. } = self.analyze(text);

        let selected: Vec<String> = ranked
            .iter()
            .take(MAX_CONCEPTS)
            .filter(|c| c.score > SELECT_CUTOFF)
            .map(|c| c.concept.clone())
            .collect();
        if !selected.is_empty() {
            return selected;
        }
        if !ranked.is_empty() {
            return ranked.into_iter().take(FALLBACK_COUNT).map(|c| c.concept).collect();
        }
        vec![domain.default_label().to_string()]
    }
}

impl ConceptExtractor for KnowledgeBaseExtractor {
    fn name(&self) -> &'static str {
        "knowledge_base"
    }

    fn extract(&self, text: &str) -> Vec<String> {
        let concepts = self.select(text);
        self.stats.record(concepts.len());
        concepts
    }

    fn extract_with_confidence(&self, text: &str) -> Vec<ConceptDetail> {
        if text.is_empty() {
            return Vec::new();
        }
        let Analysis {
            domain,
            ranked,
            pattern_labels,
        } = self.analyze(text);
        ranked
            .into_iter()
            .take(MAX_CONCEPTS)
            .map(|c| {
                let method = if pattern_labels.contains(&c.concept) {
                    CandidateSource::Pattern
                } else {
                    CandidateSource::KnowledgeBase
                };
                ConceptDetail {
                    concept: c.concept,
                    confidence: c.score,
                    domain: Some(domain),
                    method,
                }
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

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> KnowledgeBaseExtractor {
        KnowledgeBaseExtractor::builtin().unwrap()
    }

    #[test]
    fn economics_question_yields_monetary_concepts() {
        let ex = extractor();
        let text = "What is the effect of monetary policy on inflation?";
        assert_eq!(ex.domain(text), Domain::Economics);
        let concepts = ex.extract(text);
        assert!(concepts.len() <= 5);
        assert!(concepts.iter().any(|c| c.contains("Monetary") || c.contains("Economic")));
        assert_eq!(concepts[0], "Monetary Policy");
    }

    #[test]
    fn recognized_domain_without_hits_gets_default_label() {
        let ex = extractor();
        assert_eq!(ex.extract("Solve for x."), vec!["Mathematical Concepts".to_string()]);
    }

    #[test]
    fn general_domain_default_label() {
        let ex = extractor();
        assert_eq!(ex.extract("Who wrote this poem?"), vec!["Academic Knowledge".to_string()]);
    }

    #[test]
    fn empty_input_skips_detection_and_fallbacks() {
        let ex = extractor();
        assert!(ex.extract("").is_empty());
        assert!(ex.extract_with_confidence("").is_empty());
    }

    #[test]
    fn whitespace_input_gets_the_general_default() {
        let ex = extractor();
        assert_eq!(ex.extract("   "), vec!["Academic Knowledge".to_string()]);
        assert_eq!(ex.extract("\n\t"), ex.extract("???"));
        assert!(ex.extract_with_confidence("   ").is_empty());
    }

    #[test]
    fn rules_fire_regardless_of_domain() {
        let ex = extractor();
        // Physics keywords dominate, but the history rule still fires.
        let text = "How did British engineers measure force, energy and motion?";
        assert_eq!(ex.domain(text), Domain::Physics);
        let concepts = ex.extract(text);
        assert!(concepts.contains(&"Colonial Period".to_string()));
        assert!(concepts.contains(&"Classical Mechanics".to_string()));
    }

    #[test]
    fn low_scores_fall_back_to_top_three() {
        let kb = KnowledgeBase::from_toml_str(
            r#"
            [[history]]
            name = "misc"
            concepts = ["Ancient Stone Tools Survey", "Ancient Bronze Metallurgy Trade Routes", "Ancient Maritime Contacts Overview"]
            "#,
        )
        .unwrap();
        let ex = KnowledgeBaseExtractor::new(kb).unwrap();
        // One of four or five words matches each concept: confidence <= 0.525.
        let concepts = ex.extract("Discuss the ancient world.");
        assert_eq!(concepts.len(), 3);
    }

    #[test]
    fn confidence_details_carry_domain_and_method() {
        let ex = extractor();
        let details = ex.extract_with_confidence("What is the effect of monetary policy on inflation?");
        assert!(details.len() <= 5);
        let mp = details.iter().find(|d| d.concept == "Monetary Policy").unwrap();
        assert_eq!(mp.method, CandidateSource::Pattern);
        assert!((mp.confidence - 0.95).abs() < 1e-6);
        assert!(details.iter().all(|d| d.domain == Some(Domain::Economics)));
        let fiscal = details.iter().find(|d| d.concept == "Fiscal Policy");
        if let Some(f) = fiscal {
            assert_eq!(f.method, CandidateSource::KnowledgeBase);
        }
    }

    #[test]
    fn knowledge_base_confidence_is_capped() {
        let ex = extractor();
        let cands = ex.knowledge_candidates("the gupta empire and the mughal empire", Domain::History);
        let gupta = cands.iter().find(|c| c.concept == "Gupta Empire").unwrap();
        assert!((gupta.confidence - 0.9).abs() < 1e-6);
        assert!(cands.iter().all(|c| c.confidence <= 0.9));
    }
}
