//! Candidate merging shared by every extraction strategy.
//!
//! Each source proposes [`Candidate`]s; [`merge_by_max`] collapses them to one
//! score per concept label (the maximum, never a sum or average) and sorts the
//! result by descending score. Both strategies go through this single function
//! so tie-breaking is identical: equal scores keep the order in which their
//! labels were first seen.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which extraction source proposed a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Exact or fuzzy hit in the keyword → concept dictionary.
    Dictionary,
    /// Regex pattern match.
    Pattern,
    /// Phrase returned by the keyword ranker.
    KeywordRanker,
    /// Word overlap with a canonical concept in the domain knowledge base.
    KnowledgeBase,
    /// Output of an external LLM backend, passed through unmodified.
    Llm,
}

impl CandidateSource {
    /// Method string used in reports.
    pub fn method_str(&self) -> &'static str {
        match self {
            Self::Dictionary => "dictionary",
            Self::Pattern => "pattern",
            Self::KeywordRanker => "keyword_ranker",
            Self::KnowledgeBase => "knowledge_base",
            Self::Llm => "llm",
        }
    }
}

impl std::fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.method_str())
    }
}

/// A concept proposed by one source during one extraction call.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub concept: String,
    pub confidence: f32,
    pub source: CandidateSource,
}

impl Candidate {
    pub fn new(concept: impl Into<String>, confidence: f32, source: CandidateSource) -> Self {
        Self {
            concept: concept.into(),
            confidence,
            source,
        }
    }
}

/// A merged concept with its best score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredConcept {
    pub concept: String,
    pub score: f32,
    /// Source of the candidate that produced `score` (first one on ties).
    pub source: CandidateSource,
}

/// Merge candidates by trimmed label, keeping the maximum confidence per label,
/// and return them sorted by descending score.
///
/// Candidates whose label is empty after trimming are dropped. The sort is
/// stable, so labels with equal scores stay in first-seen order.
pub fn merge_by_max<I>(candidates: I) -> Vec<ScoredConcept>
where
    I: IntoIterator<Item = Candidate>,
{
    let mut merged: Vec<ScoredConcept> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        let label = candidate.concept.trim();
        if label.is_empty() {
            continue;
        }
        match index.get(label) {
            Some(&pos) => {
                let existing = &mut merged[pos];
                if candidate.confidence > existing.score {
                    existing.score = candidate.confidence;
                    existing.source = candidate.source;
                }
            }
            None => {
                index.insert(label.to_string(), merged.len());
                merged.push(ScoredConcept {
                    concept: label.to_string(),
                    score: candidate.confidence,
                    source: candidate.source,
                });
            }
        }
    }

    sort_descending(&mut merged);
    merged
}

/// Stable sort by descending score.
pub fn sort_descending(concepts: &mut [ScoredConcept]) {
    concepts.sort_by(|a, b| b.score.total_cmp(&a.score));
}
