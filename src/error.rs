//! Rich diagnostic error types for exam-concepts.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.
//!
//! Extraction itself never fails for any input text: dictionary problems are
//! logged and absorbed, ranker failures degrade to zero ranker candidates.
//! Only construction-time defects (a static pattern that does not compile) and
//! the surrounding I/O layer surface as errors.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for exam-concepts.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum ConceptError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Llm(#[from] crate::extractor::llm::LlmError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Report(#[from] ReportError),
}

// ---------------------------------------------------------------------------
// Pattern errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PatternError {
    #[error("invalid pattern in category \"{category}\": {pattern}")]
    #[diagnostic(
        code(concepts::patterns::invalid_regex),
        help(
            "A static concept pattern failed to compile. This is a defect in the \
             pattern table, not in the input text. Fix the regular expression and rebuild."
        )
    )]
    InvalidRegex {
        category: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Convenience alias for pattern compilation results.
pub type PatternResult<T> = std::result::Result<T, PatternError>;

// ---------------------------------------------------------------------------
// Dictionary errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DictionaryError {
    #[error("failed to read dictionary file: {path}")]
    #[diagnostic(
        code(concepts::dictionary::io),
        help("Check that the dictionary file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("dictionary is missing required columns (found: {found})")]
    #[diagnostic(
        code(concepts::dictionary::missing_columns),
        help(
            "A concept dictionary must be a CSV file with a header row containing \
             `keyword` and `concept` columns."
        )
    )]
    MissingColumns { found: String },

    #[error("dictionary is not valid CSV: {message}")]
    #[diagnostic(
        code(concepts::dictionary::malformed),
        help("Check quoting: fields containing commas or quotes must be wrapped in double quotes.")
    )]
    Malformed { message: String },

    #[error("dictionary is empty: no header row")]
    #[diagnostic(
        code(concepts::dictionary::empty),
        help("Add a `keyword,concept` header row followed by one mapping per line.")
    )]
    Empty,
}

/// Convenience alias for dictionary loading results.
pub type DictionaryResult<T> = std::result::Result<T, DictionaryError>;

// ---------------------------------------------------------------------------
// Knowledge base errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum KnowledgeError {
    #[error("failed to read knowledge base: {path}")]
    #[diagnostic(
        code(concepts::knowledge::io),
        help("Check that the knowledge base file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse knowledge base: {message}")]
    #[diagnostic(
        code(concepts::knowledge::parse),
        help(
            "The knowledge base is TOML with one array of tables per domain, e.g. \
             `[[economics]] name = \"policies\" concepts = [\"Monetary Policy\"]`."
        )
    )]
    Parse { message: String },
}

/// Convenience alias for knowledge base results.
pub type KnowledgeResult<T> = std::result::Result<T, KnowledgeError>;

// ---------------------------------------------------------------------------
// Question input errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum QuestionError {
    #[error("questions file not found: {path}")]
    #[diagnostic(
        code(concepts::questions::not_found),
        help("Place the subject's questions at `<resources_dir>/<subject>.csv`.")
    )]
    NotFound { path: String },

    #[error("failed to read questions file: {path}")]
    #[diagnostic(
        code(concepts::questions::io),
        help("Check file permissions and that the file is valid UTF-8.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("questions file {path} is not valid CSV: {message}")]
    #[diagnostic(
        code(concepts::questions::malformed),
        help("Check quoting: fields containing commas or quotes must be wrapped in double quotes.")
    )]
    Malformed { path: String, message: String },

    #[error("questions file {path} is missing columns: {missing}")]
    #[diagnostic(
        code(concepts::questions::missing_columns),
        help(
            "Expected columns: Question Number, Question, Option A, Option B, \
             Option C, Option D, Answer."
        )
    )]
    MissingColumns { path: String, missing: String },

    #[error("no questions found in {path}")]
    #[diagnostic(
        code(concepts::questions::empty),
        help("The file has a header but no usable rows.")
    )]
    Empty { path: String },
}

/// Convenience alias for question input results.
pub type QuestionResult<T> = std::result::Result<T, QuestionError>;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(concepts::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(concepts::config::parse),
        help("Check the TOML syntax. Run `exam-concepts config init` to write a fresh default.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(concepts::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config: {message}")]
    #[diagnostic(code(concepts::config::serialize))]
    Serialize { message: String },

    #[error("failed to create directory: {path}")]
    #[diagnostic(
        code(concepts::config::create_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("failed to write report: {path}")]
    #[diagnostic(
        code(concepts::report::write),
        help("Check that the output directory exists and is writable.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {message}")]
    #[diagnostic(code(concepts::report::serialize))]
    Serialize { message: String },
}

/// Convenience alias for report results.
pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// Convenience alias for top-level results.
pub type ConceptResult<T> = std::result::Result<T, ConceptError>;

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic;

    #[test]
    fn diagnostic_codes_survive_wrapping() {
        let err: ConceptError = DictionaryError::MissingColumns {
            found: "word, label".into(),
        }
        .into();
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("concepts::dictionary::missing_columns"));
        assert!(err.to_string().contains("word, label"));
    }
}
