//! Keyword → concept dictionary and the derived concept weight table.
//!
//! The dictionary is tabular configuration data with `keyword` and `concept`
//! columns. It is loaded once when an extractor is built and never mutated
//! afterwards; the weight table is recomputed from it, never patched.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{DictionaryError, DictionaryResult};
use crate::tabular::Table;

/// Concept terms that mark an important, specific concept.
const BOOST_TERMS: &[&str] = &["civilization", "empire", "period", "law", "theory"];

/// Concept terms that mark an overly general concept.
const DAMPEN_TERMS: &[&str] = &["general", "basic", "simple"];

const BASE_WEIGHT: f32 = 1.0;
const BOOST: f32 = 0.5;
const DAMPEN: f32 = 0.3;
const MIN_WEIGHT: f32 = 0.1;

/// One `keyword → concept` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// Lowercased, trimmed keyword or phrase.
    pub keyword: String,
    /// Trimmed canonical concept label.
    pub concept: String,
}

/// Many-to-one mapping from lowercase keywords to canonical concepts.
///
/// Iteration follows first-insertion order of each keyword, so extraction is
/// deterministic. A duplicate keyword replaces the earlier concept in place.
#[derive(Debug, Clone, Default)]
pub struct ConceptDictionary {
    entries: Vec<DictionaryEntry>,
    index: HashMap<String, usize>,
}

impl ConceptDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(keyword, concept)` pairs. Pairs with an empty side are skipped.
    pub fn from_pairs<K, C>(pairs: impl IntoIterator<Item = (K, C)>) -> Self
    where
        K: AsRef<str>,
        C: AsRef<str>,
    {
        let mut dict = Self::new();
        for (keyword, concept) in pairs {
            dict.insert(keyword.as_ref(), concept.as_ref());
        }
        dict
    }

    /// Parse dictionary CSV text with `keyword` and `concept` columns.
    pub fn from_csv_str(content: &str) -> DictionaryResult<Self> {
        let table = Table::parse(content)
            .map_err(|e| DictionaryError::Malformed { message: e.to_string() })?
            .ok_or(DictionaryError::Empty)?;
        let (Some(kw_col), Some(concept_col)) = (table.column("keyword"), table.column("concept"))
        else {
            return Err(DictionaryError::MissingColumns {
                found: table.header().iter().collect::<Vec<_>>().join(", "),
            });
        };

        let mut dict = Self::new();
        for record in table.records() {
            let keyword = record.get(kw_col).unwrap_or_default();
            let concept = record.get(concept_col).unwrap_or_default();
            dict.insert(keyword, concept);
        }
        Ok(dict)
    }

    /// Read and parse a dictionary file.
    pub fn try_load(path: &Path) -> DictionaryResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_csv_str(&content)
    }

    /// Load a dictionary file, falling back to an empty dictionary on any error.
    ///
    /// A malformed source is a configuration warning, never a construction failure.
    pub fn load_or_warn(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(dict) => {
                tracing::info!(path = %path.display(), entries = dict.len(), "loaded concept dictionary");
                dict
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "concept dictionary unusable, continuing with an empty dictionary"
                );
                Self::new()
            }
        }
    }

    /// Insert or overwrite a mapping. Returns `false` if either side is blank.
    pub fn insert(&mut self, keyword: &str, concept: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        let concept = concept.trim();
        if keyword.is_empty() || concept.is_empty() {
            return false;
        }
        match self.index.get(&keyword) {
            Some(&pos) => self.entries[pos].concept = concept.to_string(),
            None => {
                self.index.insert(keyword.clone(), self.entries.len());
                self.entries.push(DictionaryEntry {
                    keyword,
                    concept: concept.to_string(),
                });
            }
        }
        true
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.index
            .get(keyword)
            .map(|&pos| self.entries[pos].concept.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Concept → importance multiplier, derived from a dictionary.
///
/// Concepts absent from the table weigh [`WeightTable::DEFAULT`].
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    weights: HashMap<String, f32>,
}

impl WeightTable {
    pub const DEFAULT: f32 = 1.0;

    /// Compute the weight of every concept in `dictionary`.
    pub fn from_dictionary(dictionary: &ConceptDictionary) -> Self {
        let weights = dictionary
            .entries()
            .map(|e| (e.concept.clone(), concept_weight(&e.concept)))
            .collect();
        Self { weights }
    }

    pub fn get(&self, concept: &str) -> f32 {
        self.weights.get(concept).copied().unwrap_or(Self::DEFAULT)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Weight of a single concept label. Always within `[0.1, 1.5]`.
pub fn concept_weight(concept: &str) -> f32 {
    let lower = concept.to_lowercase();
    let mut weight = BASE_WEIGHT;
    if BOOST_TERMS.iter().any(|t| lower.contains(t)) {
        weight += BOOST;
    }
    if DAMPEN_TERMS.iter().any(|t| lower.contains(t)) {
        weight -= DAMPEN;
    }
    weight.max(MIN_WEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_are_normalized() {
        let dict = ConceptDictionary::from_csv_str(
            "keyword,concept\n  Harappan ,  Indus Valley Civilization \nmonetary policy,Monetary Economics\n",
        )
        .unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("harappan"), Some("Indus Valley Civilization"));
    }

    #[test]
    fn empty_cells_are_skipped() {
        let dict = ConceptDictionary::from_csv_str("keyword,concept\n,Orphan\nlonely,\ngdp,National Income\n")
            .unwrap();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("gdp"), Some("National Income"));
    }

    #[test]
    fn duplicate_keyword_last_wins_in_first_position() {
        let dict = ConceptDictionary::from_csv_str(
            "keyword,concept\nrent,Land Revenue\ntax,Taxation\nrent,Ricardian Rent\n",
        )
        .unwrap();
        let entries: Vec<(&str, &str)> = dict
            .entries()
            .map(|e| (e.keyword.as_str(), e.concept.as_str()))
            .collect();
        assert_eq!(entries, vec![("rent", "Ricardian Rent"), ("tax", "Taxation")]);
    }

    #[test]
    fn extra_columns_are_fine() {
        let dict = ConceptDictionary::from_csv_str("id,concept,keyword\n1,Vedic Period,veda\n").unwrap();
        assert_eq!(dict.get("veda"), Some("Vedic Period"));
    }

    #[test]
    fn quoted_concepts_keep_commas() {
        let dict = ConceptDictionary::from_csv_str(
            "keyword,concept\n\"drain of wealth\",\"Colonial Economy, Drain Theory\"\n",
        )
        .unwrap();
        assert_eq!(dict.get("drain of wealth"), Some("Colonial Economy, Drain Theory"));
    }

    #[test]
    fn missing_columns_is_an_error() {
        let err = ConceptDictionary::from_csv_str("word,label\nx,y\n").unwrap_err();
        assert!(matches!(err, DictionaryError::MissingColumns { .. }));
    }

    #[test]
    fn load_or_warn_never_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let bad = dir.path().join("bad.csv");
        std::fs::write(&bad, "word,label\nx,y\n").unwrap();
        assert!(ConceptDictionary::load_or_warn(&bad).is_empty());
        assert!(ConceptDictionary::load_or_warn(&dir.path().join("missing.csv")).is_empty());
    }

    #[test]
    fn weights_boost_dampen_and_floor() {
        assert_eq!(concept_weight("Indus Valley Civilization"), 1.5);
        assert_eq!(concept_weight("Monetary Economics"), 1.0);
        assert!((concept_weight("Basic Arithmetic") - 0.7).abs() < 1e-6);
        assert!((concept_weight("General Theory of Relativity") - 1.2).abs() < 1e-6);
    }

    #[test]
    fn weight_table_defaults_to_one() {
        let dict = ConceptDictionary::from_pairs([("mughal", "Mughal Empire")]);
        let weights = WeightTable::from_dictionary(&dict);
        assert_eq!(weights.get("Mughal Empire"), 1.5);
        assert_eq!(weights.get("Unknown Concept"), WeightTable::DEFAULT);
    }
}
