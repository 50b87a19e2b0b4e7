// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # exam-concepts
//!
//! Assigns normalized concept labels to free-text exam questions for
//! coverage, frequency and method-comparison analytics.
//!
//! ## Architecture
//!
//! - **Sources**: keyword dictionary (`dictionary`), regex rule tables
//!   (`patterns`), statistical keyword ranking (`ranker`), domain knowledge
//!   base (`knowledge`)
//! - **Scoring** (`scoring`): merge-by-max over candidates from every source
//! - **Strategies** (`extractor`): hybrid, knowledge-base and LLM-backed
//!   extractors behind one `ConceptExtractor` trait
//! - **I/O layer**: question CSVs (`questions`), reports (`report`),
//!   multi-subject runs (`batch`), method comparison (`evaluate`)
//!
//! ## Library usage
//!
//! ```no_run
//! use exam_concepts::dictionary::ConceptDictionary;
//! use exam_concepts::extractor::{ConceptExtractor, HybridConfig, HybridExtractor};
//!
//! let dictionary = ConceptDictionary::from_pairs([("harappan", "Indus Valley Civilization")]);
//! let extractor = HybridExtractor::new(HybridConfig::default(), dictionary).unwrap();
//! let concepts = extractor.extract("Describe the Harappan civilization.");
//! assert!(concepts.contains(&"Indus Valley Civilization".to_string()));
//! ```

pub mod batch;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod evaluate;
pub mod extractor;
pub mod knowledge;
pub mod patterns;
pub mod questions;
pub mod ranker;
pub mod report;
pub mod scoring;
pub mod stopwords;
pub mod tabular;
pub mod text;
