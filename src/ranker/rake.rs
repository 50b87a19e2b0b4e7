//! RAKE (Rapid Automatic Keyword Extraction) over the `rake` crate.
//!
//! Candidate phrases are runs of content words split at stopwords and
//! punctuation; each phrase scores the sum of its words' `degree / frequency`.

use std::collections::HashSet;

use ::rake::{Rake, StopWords};

use super::{KeywordRanker, RankedPhrase, RankerResult};
use crate::stopwords::Stopwords;

/// Default keyword ranker.
pub struct RakeRanker {
    rake: Rake,
}

impl std::fmt::Debug for RakeRanker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RakeRanker").finish_non_exhaustive()
    }
}

impl Default for RakeRanker {
    fn default() -> Self {
        Self::new(Stopwords::english())
    }
}

impl RakeRanker {
    pub fn new(stopwords: Stopwords) -> Self {
        let mut sw = StopWords::new();
        for word in stopwords.iter() {
            sw.insert(word.to_string());
        }
        Self { rake: Rake::new(sw) }
    }
}

impl KeywordRanker for RakeRanker {
    fn rank(&self, text: &str) -> RankerResult<Vec<RankedPhrase>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut ranked: Vec<RankedPhrase> = self
            .rake
            .run(&text.to_lowercase())
            .into_iter()
            .map(|k| RankedPhrase {
                phrase: k.keyword.split_whitespace().collect::<Vec<_>>().join(" "),
                score: k.score,
            })
            .filter(|p| !p.phrase.is_empty())
            .collect();

        // Score ties come back in hash order; break them by phrase.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.phrase.cmp(&b.phrase)));
        let mut seen = HashSet::new();
        ranked.retain(|p| seen.insert(p.phrase.clone()));
        Ok(ranked)
    }
}
