//! Statistical keyword ranking.
//!
//! The hybrid strategy treats the ranker as a pluggable collaborator: anything
//! implementing [`KeywordRanker`] can be swapped in. [`RakeRanker`], backed by
//! the `rake` crate, is the default implementation.

pub mod rake;

use miette::Diagnostic;
use thiserror::Error;

pub use self::rake::RakeRanker;

/// Errors a keyword ranker may report.
///
/// The hybrid strategy absorbs these: a failing ranker contributes zero
/// candidates and the other sources still run.
#[derive(Debug, Error, Diagnostic)]
pub enum RankerError {
    #[error("keyword ranker failed: {message}")]
    #[diagnostic(
        code(concepts::ranker::failed),
        help("The ranker could not process the text. Extraction continues without ranked phrases.")
    )]
    Failed { message: String },
}

/// Convenience alias for ranker results.
pub type RankerResult<T> = std::result::Result<T, RankerError>;

/// A phrase with a ranker-defined importance score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPhrase {
    pub phrase: String,
    pub score: f64,
}

/// Ranks the phrases of a text by statistical importance.
///
/// Implementations return phrases ordered by descending score. The score scale
/// is implementation-defined; callers normalize it themselves.
pub trait KeywordRanker: Send + Sync {
    fn rank(&self, text: &str) -> RankerResult<Vec<RankedPhrase>>;
}

impl<F> KeywordRanker for F
where
    F: Fn(&str) -> RankerResult<Vec<RankedPhrase>> + Send + Sync,
{
    fn rank(&self, text: &str) -> RankerResult<Vec<RankedPhrase>> {
        self(text)
    }
}
