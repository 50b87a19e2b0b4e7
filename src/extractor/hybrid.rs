//! Hybrid strategy: dictionary, patterns and keyword ranking.
//!
//! Pipeline per call:
//!
//! 1. dictionary exact (0.9) and fuzzy (`0.6 + fraction * 0.2`) matches,
//! 2. every match of every hybrid pattern (0.8, title-cased matched text),
//! 3. the top ranked phrases (`min(1, score / 10)`, title-cased),
//! 4. concept weights applied, merged by max, sorted, truncated,
//! 5. threshold filter, falling back to the top 2 when nothing survives.

use std::path::Path;

use super::{ConceptDetail, ConceptExtractor, ExtractionStats, StatsSnapshot};
use crate::config::ExtractionConfig;
use crate::dictionary::{ConceptDictionary, WeightTable};
use crate::error::PatternResult;
use crate::patterns::PatternSet;
use crate::ranker::{KeywordRanker, RakeRanker};
use crate::scoring::{merge_by_max, Candidate, CandidateSource, ScoredConcept};
use crate::stopwords::Stopwords;
use crate::text::{title_case, word_coverage};

const EXACT_CONFIDENCE: f32 = 0.9;
const FUZZY_BASE: f32 = 0.6;
const FUZZY_SPAN: f32 = 0.2;
const FUZZY_MIN_FRACTION: f32 = 0.7;
/// Keywords this short only ever match exactly.
const FUZZY_MIN_KEYWORD_LEN: usize = 4;
const RANKER_SCORE_SCALE: f64 = 10.0;
/// Concepts returned when the threshold filter removes everything.
const FALLBACK_COUNT: usize = 2;

/// Parameters of the hybrid strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridConfig {
    pub confidence_threshold: f32,
    pub max_concepts: usize,
    pub min_concept_length: usize,
    pub use_patterns: bool,
    pub use_fuzzy_matching: bool,
    pub max_ranked_phrases: usize,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self::from(&ExtractionConfig::default())
    }
}

impl From<&ExtractionConfig> for HybridConfig {
    fn from(c: &ExtractionConfig) -> Self {
        Self {
            confidence_threshold: c.confidence_threshold,
            max_concepts: c.max_concepts,
            min_concept_length: c.min_concept_length,
            use_patterns: c.use_patterns,
            use_fuzzy_matching: c.use_fuzzy_matching,
            max_ranked_phrases: c.max_ranked_phrases,
        }
    }
}

/// The hybrid concept extractor.
pub struct HybridExtractor {
    config: HybridConfig,
    dictionary: ConceptDictionary,
    weights: WeightTable,
    patterns: PatternSet,
    ranker: Box<dyn KeywordRanker>,
    stats: ExtractionStats,
}

impl std::fmt::Debug for HybridExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridExtractor")
            .field("config", &self.config)
            .field("dictionary_entries", &self.dictionary.len())
            .field("patterns", &self.patterns.len())
            .finish_non_exhaustive()
    }
}

impl HybridExtractor {
    /// Build with the default RAKE ranker over English stopwords.
    pub fn new(config: HybridConfig, dictionary: ConceptDictionary) -> PatternResult<Self> {
        let weights = WeightTable::from_dictionary(&dictionary);
        Ok(Self {
            config,
            dictionary,
            weights,
            patterns: PatternSet::hybrid()?,
            ranker: Box::new(RakeRanker::default()),
            stats: ExtractionStats::new(),
        })
    }

    /// Build from project settings and an optional dictionary file.
    ///
    /// An unusable dictionary or stopword file is logged and skipped.
    pub fn from_config(config: &ExtractionConfig, dictionary: Option<&Path>) -> PatternResult<Self> {
        let dictionary = match dictionary {
            Some(path) if path.exists() => ConceptDictionary::load_or_warn(path),
            Some(path) => {
                tracing::warn!(path = %path.display(), "concept dictionary not found, continuing without one");
                ConceptDictionary::new()
            }
            None => ConceptDictionary::new(),
        };
        let stopwords = match &config.stopwords_file {
            Some(path) => Stopwords::with_file(path),
            None => Stopwords::english(),
        };
        Ok(Self::new(HybridConfig::from(config), dictionary)?.with_ranker(RakeRanker::new(stopwords)))
    }

    /// Replace the keyword ranker.
    pub fn with_ranker(mut self, ranker: impl KeywordRanker + 'static) -> Self {
        self.ranker = Box::new(ranker);
        self
    }

    pub fn config(&self) -> &HybridConfig {
        &self.config
    }

    pub fn dictionary(&self) -> &ConceptDictionary {
        &self.dictionary
    }

    /// Every source's candidates for `text`, before weighting.
    pub fn candidates(&self, text: &str) -> Vec<Candidate> {
        let text_lower = text.to_lowercase();
        let mut out = self.dictionary_candidates(&text_lower);
        if self.config.use_patterns {
            out.extend(self.patterns.candidates(&text_lower));
        }
        out.extend(self.ranker_candidates(text));
        out
    }

    /// Weighted, merged concepts sorted by score and truncated to
    /// `max_concepts`, before the threshold filter.
    pub fn score(&self, text: &str) -> Vec<ScoredConcept> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let weighted = self.candidates(text).into_iter().map(|mut c| {
            c.confidence *= self.weights.get(c.concept.trim());
            c
        });
        let mut ranked = merge_by_max(weighted);
        ranked.truncate(self.config.max_concepts);
        ranked
    }

    /// Threshold filter with the top-2 fallback.
    ///
    /// Also returns how many concepts passed the threshold; fallback
    /// concepts are not counted in the statistics.
    fn select(&self, text: &str) -> (Vec<ScoredConcept>, usize) {
        let ranked = self.score(text);
        let threshold = self.config.confidence_threshold;
        let passed = ranked.iter().filter(|c| c.score >= threshold).count();
        if passed > 0 {
            (ranked.into_iter().filter(|c| c.score >= threshold).collect(), passed)
        } else {
            (ranked.into_iter().take(FALLBACK_COUNT).collect(), 0)
        }
    }

    fn dictionary_candidates(&self, text_lower: &str) -> Vec<Candidate> {
        let mut out = Vec::new();
        for entry in self.dictionary.entries() {
            if text_lower.contains(entry.keyword.as_str()) {
                out.push(Candidate::new(
                    entry.concept.clone(),
                    EXACT_CONFIDENCE,
                    CandidateSource::Dictionary,
                ));
                continue;
            }
            if !self.config.use_fuzzy_matching || entry.keyword.chars().count() <= FUZZY_MIN_KEYWORD_LEN {
                continue;
            }
            let (matched, total) = word_coverage(&entry.keyword, text_lower);
            if total == 0 || (matched as f32) < total as f32 * FUZZY_MIN_FRACTION {
                continue;
            }
            let fraction = matched as f32 / total as f32;
            out.push(Candidate::new(
                entry.concept.clone(),
                FUZZY_BASE + fraction * FUZZY_SPAN,
                CandidateSource::Dictionary,
            ));
        }
        out
    }

    fn ranker_candidates(&self, text: &str) -> Vec<Candidate> {
        let ranked = match self.ranker.rank(text) {
            Ok(ranked) => ranked,
            Err(e) => {
                tracing::warn!(error = %e, "keyword ranking failed, continuing without ranked phrases");
                return Vec::new();
            }
        };
        ranked
            .into_iter()
            .take(self.config.max_ranked_phrases)
            .filter(|p| {
                p.phrase.split_whitespace().count() >= 2
                    && p.phrase.chars().count() > self.config.min_concept_length
            })
            .map(|p| {
                let score = (p.score / RANKER_SCORE_SCALE).min(1.0) as f32;
                Candidate::new(title_case(&p.phrase), score, CandidateSource::KeywordRanker)
            })
            .collect()
    }
}

impl ConceptExtractor for HybridExtractor {
    fn name(&self) -> &'static str {
        "hybrid"
    }

    fn extract(&self, text: &str) -> Vec<String> {
        let (selected, passed) = self.select(text);
        self.stats.record(passed);
        selected.into_iter().map(|c| c.concept).collect()
    }

    fn extract_with_confidence(&self, text: &str) -> Vec<ConceptDetail> {
        self.select(text)
            .0
            .into_iter()
            .map(|c| ConceptDetail {
                concept: c.concept,
                confidence: c.score,
                domain: None,
                method: c.source,
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
