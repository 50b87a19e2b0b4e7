//! Stopword provider for the keyword ranker.
//!
//! The English base set comes from the `stop_words` crate and can be
//! extended with user-supplied words read from a plain-text file (one word
//! per line).

use std::collections::HashSet;
use std::path::Path;

use stop_words::LANGUAGE;

/// A case-insensitive stopword set.
#[derive(Debug, Clone)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// The English set shipped by `stop_words`.
    pub fn english() -> Self {
        Self {
            words: stop_words::get(LANGUAGE::English)
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect(),
        }
    }

    /// The English set plus every non-empty line of `path`, lowercased.
    ///
    /// A missing or unreadable file is logged and ignored.
    pub fn with_file(path: &Path) -> Self {
        let mut stopwords = Self::english();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let before = stopwords.len();
                stopwords.extend(content.lines());
                tracing::debug!(
                    path = %path.display(),
                    added = stopwords.len() - before,
                    "loaded custom stopwords"
                );
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "custom stopword file unreadable, using the English set only"
                );
            }
        }
        stopwords
    }

    /// Add words to the set. Blank entries are ignored.
    pub fn extend<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) {
        for word in words {
            let word = word.trim();
            if !word.is_empty() {
                self.words.insert(word.to_lowercase());
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_set_is_case_insensitive() {
        let sw = Stopwords::english();
        assert!(sw.contains("the"));
        assert!(sw.contains("The"));
        assert!(sw.contains("and"));
        assert!(!sw.contains("civilization"));
        assert!(!sw.contains("inflation"));
    }

    #[test]
    fn file_additions_extend_base_set() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("extra.txt");
        std::fs::write(&path, "Harappan\n\n  vedic  \n").unwrap();

        let sw = Stopwords::with_file(&path);
        assert!(sw.contains("harappan"));
        assert!(sw.contains("VEDIC"));
        assert!(sw.contains("and"));
        assert_eq!(sw.len(), Stopwords::english().len() + 2);
    }

    #[test]
    fn missing_file_falls_back_to_base() {
        let sw = Stopwords::with_file(Path::new("/nonexistent/stopwords.txt"));
        assert_eq!(sw.len(), Stopwords::english().len());
    }
}
