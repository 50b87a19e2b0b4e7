//! Side-by-side comparison of the hybrid and knowledge-base strategies.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Serialize;

use crate::batch::BatchProcessor;
use crate::config::ProjectConfig;
use crate::error::ConceptResult;
use crate::extractor::ExtractionMethod;
use crate::report::{most_common, serialize_pairs, ConceptCounts, ExtractedQuestion, SubjectStatistics};

/// Coverage gap, in percentage points, that counts as a clear win.
const COVERAGE_MARGIN: f64 = 10.0;
/// Overlap percentage above which both methods count as equivalent.
const HIGH_OVERLAP: f64 = 70.0;
const UNIQUE_LISTED: usize = 10;
const COMMON_LISTED: usize = 5;

/// Extraction statistics of one method on one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodStats {
    pub total_questions: usize,
    pub questions_with_concepts: usize,
    pub coverage_percentage: f64,
    pub total_concepts_extracted: usize,
    pub unique_concepts: usize,
    pub avg_concepts_per_question: f64,
    pub most_common_concepts: ConceptCounts,
}

impl MethodStats {
    pub fn compute(rows: &[ExtractedQuestion]) -> Self {
        let base = SubjectStatistics::compute(rows, Duration::ZERO);
        let total_concepts_extracted: usize = rows.iter().map(ExtractedQuestion::concept_count).sum();
        let concepts = rows.iter().flat_map(|r| r.concepts.iter().map(String::as_str));
        Self {
            total_questions: base.total_questions,
            questions_with_concepts: base.questions_with_concepts,
            coverage_percentage: base.coverage_percentage,
            total_concepts_extracted,
            unique_concepts: base.unique_concepts_count,
            avg_concepts_per_question: if rows.is_empty() {
                0.0
            } else {
                total_concepts_extracted as f64 / rows.len() as f64
            },
            most_common_concepts: most_common(concepts, COMMON_LISTED),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapAnalysis {
    pub total_hybrid_concepts: usize,
    pub total_llm_concepts: usize,
    pub overlapping_concepts: usize,
    /// Shared concepts as a percentage of all distinct concepts.
    pub overlap_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniqueConcepts {
    pub hybrid_only: Vec<String>,
    pub llm_only: Vec<String>,
}

/// Both methods run over the same subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodComparison {
    pub subject: String,
    pub hybrid_stats: MethodStats,
    pub llm_stats: MethodStats,
    pub overlap_analysis: OverlapAnalysis,
    pub unique_concepts: UniqueConcepts,
}

impl MethodComparison {
    /// Compare two result sets for the same questions.
    pub fn from_rows(subject: &str, hybrid: &[ExtractedQuestion], llm: &[ExtractedQuestion]) -> Self {
        let distinct = |rows: &[ExtractedQuestion]| -> BTreeSet<String> {
            rows.iter().flat_map(|r| r.concepts.iter().cloned()).collect()
        };
        let hybrid_set = distinct(hybrid);
        let llm_set = distinct(llm);
        let overlap = hybrid_set.intersection(&llm_set).count();
        let union = hybrid_set.union(&llm_set).count();

        Self {
            subject: subject.to_string(),
            hybrid_stats: MethodStats::compute(hybrid),
            llm_stats: MethodStats::compute(llm),
            overlap_analysis: OverlapAnalysis {
                total_hybrid_concepts: hybrid_set.len(),
                total_llm_concepts: llm_set.len(),
                overlapping_concepts: overlap,
                overlap_percentage: overlap as f64 / union.max(1) as f64 * 100.0,
            },
            unique_concepts: UniqueConcepts {
                hybrid_only: hybrid_set.difference(&llm_set).take(UNIQUE_LISTED).cloned().collect(),
                llm_only: llm_set.difference(&hybrid_set).take(UNIQUE_LISTED).cloned().collect(),
            },
        }
    }
}

/// Run both strategies on `subject` and compare their output.
pub fn compare_methods(config: &ProjectConfig, subject: &str) -> ConceptResult<MethodComparison> {
    let (hybrid, _) = BatchProcessor::new(config, ExtractionMethod::Hybrid).process_subject(subject)?;
    let (llm, _) = BatchProcessor::new(config, ExtractionMethod::Llm).process_subject(subject)?;
    Ok(MethodComparison::from_rows(subject, &hybrid, &llm))
}

/// Averages across every successfully compared subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallInsights {
    pub average_hybrid_coverage: f64,
    pub average_llm_coverage: f64,
    pub average_concept_overlap: f64,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComparisonOutcome {
    Compared(Box<MethodComparison>),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub timestamp: String,
    pub subjects_analyzed: usize,
    #[serde(serialize_with = "serialize_pairs")]
    pub method_comparisons: Vec<(String, ComparisonOutcome)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_insights: Option<OverallInsights>,
}

/// Compare methods on every subject and summarize.
///
/// A subject that cannot be compared is recorded as a failure.
pub fn performance_report(config: &ProjectConfig, subjects: &[String]) -> PerformanceReport {
    let mut comparisons = Vec::with_capacity(subjects.len());
    for subject in subjects {
        let outcome = match compare_methods(config, subject) {
            Ok(c) => ComparisonOutcome::Compared(Box::new(c)),
            Err(e) => {
                tracing::error!(subject = %subject, error = %e, "comparison failed");
                ComparisonOutcome::Failed { error: e.to_string() }
            }
        };
        comparisons.push((subject.clone(), outcome));
    }

    let compared: Vec<&MethodComparison> = comparisons
        .iter()
        .filter_map(|(_, o)| match o {
            ComparisonOutcome::Compared(c) => Some(c.as_ref()),
            ComparisonOutcome::Failed { .. } => None,
        })
        .collect();

    let overall_insights = (!compared.is_empty()).then(|| {
        let n = compared.len() as f64;
        let hybrid = compared.iter().map(|c| c.hybrid_stats.coverage_percentage).sum::<f64>() / n;
        let llm = compared.iter().map(|c| c.llm_stats.coverage_percentage).sum::<f64>() / n;
        let overlap = compared.iter().map(|c| c.overlap_analysis.overlap_percentage).sum::<f64>() / n;
        OverallInsights {
            average_hybrid_coverage: hybrid,
            average_llm_coverage: llm,
            average_concept_overlap: overlap,
            recommendation: recommendation(hybrid, llm, overlap).to_string(),
        }
    });

    PerformanceReport {
        timestamp: chrono::Local::now().to_rfc3339(),
        subjects_analyzed: subjects.len(),
        method_comparisons: comparisons,
        overall_insights,
    }
}

/// Which method to prefer, given average coverage and overlap percentages.
pub fn recommendation(hybrid_coverage: f64, llm_coverage: f64, overlap: f64) -> &'static str {
    if hybrid_coverage > llm_coverage + COVERAGE_MARGIN {
        "Hybrid method shows significantly better coverage. Recommended for production."
    } else if llm_coverage > hybrid_coverage + COVERAGE_MARGIN {
        "LLM method shows significantly better coverage. Consider LLM integration."
    } else if overlap > HIGH_OVERLAP {
        "Both methods show similar results with high overlap. Choose based on cost considerations."
    } else {
        "Methods show complementary results. Consider ensemble approach combining both."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(sets: &[&[&str]]) -> Vec<ExtractedQuestion> {
        sets.iter()
            .enumerate()
            .map(|(i, concepts)| ExtractedQuestion {
                number: (i + 1).to_string(),
                question: String::new(),
                concepts: concepts.iter().map(|c| (*c).to_string()).collect(),
            })
            .collect()
    }

    #[test]
    fn overlap_is_share_of_union() {
        let hybrid = rows(&[&["A", "B"], &["C"]]);
        let llm = rows(&[&["B"], &["C", "D"]]);
        let cmp = MethodComparison::from_rows("economics", &hybrid, &llm);
        assert_eq!(cmp.overlap_analysis.overlapping_concepts, 2);
        assert_eq!(cmp.overlap_analysis.overlap_percentage, 50.0);
        assert_eq!(cmp.unique_concepts.hybrid_only, vec!["A"]);
        assert_eq!(cmp.unique_concepts.llm_only, vec!["D"]);
    }

    #[test]
    fn no_concepts_anywhere_is_zero_overlap() {
        let empty = rows(&[&[], &[]]);
        let cmp = MethodComparison::from_rows("x", &empty, &empty);
        assert_eq!(cmp.overlap_analysis.overlap_percentage, 0.0);
        assert_eq!(cmp.hybrid_stats.coverage_percentage, 0.0);
    }

    #[test]
    fn method_stats_average_over_all_questions() {
        let stats = MethodStats::compute(&rows(&[&["A", "B", "A"], &[]]));
        assert_eq!(stats.total_concepts_extracted, 3);
        assert_eq!(stats.avg_concepts_per_question, 1.5);
        assert_eq!(stats.coverage_percentage, 50.0);
        assert_eq!(stats.most_common_concepts.0[0], ("A".to_string(), 2));
    }

    #[test]
    fn recommendations() {
        assert!(recommendation(90.0, 70.0, 20.0).starts_with("Hybrid"));
        assert!(recommendation(60.0, 75.0, 20.0).starts_with("LLM"));
        assert!(recommendation(80.0, 85.0, 75.0).starts_with("Both"));
        assert!(recommendation(80.0, 85.0, 40.0).starts_with("Methods"));
    }
}
