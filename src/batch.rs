//! Multi-subject batch processing.
//!
//! Each subject is processed independently: a failing subject is recorded in
//! the summary and the batch moves on.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::config::ProjectConfig;
use crate::error::{ConceptResult, QuestionError};
use crate::extractor::{build_extractor, ExtractionMethod};
use crate::questions::read_questions;
use crate::report::{self, extract_questions, serialize_pairs, ExtractedQuestion, SubjectStatistics};

/// Timestamp format used in batch output file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Subjects with a `<subject>.csv` file in `resources_dir`, sorted.
pub fn discover_subjects(resources_dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(resources_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %resources_dir.display(), error = %e, "cannot list resources directory");
            return Vec::new();
        }
    };
    let mut subjects: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"))
        .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    subjects.sort();
    subjects
}

/// Outcome of one subject in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SubjectOutcome {
    Success(SubjectStatistics),
    Failure { error: String },
}

impl SubjectOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStatistics {
    pub total_questions_processed: usize,
    /// Sum of per-subject unique concept counts.
    pub total_unique_concepts: usize,
    pub average_concepts_per_subject: f64,
}

/// Summary of a whole batch run, written as `batch_summary_<timestamp>.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub timestamp: String,
    pub total_subjects_processed: usize,
    pub successful_subjects: usize,
    pub failed_subjects: usize,
    #[serde(serialize_with = "serialize_pairs")]
    pub subject_details: Vec<(String, SubjectOutcome)>,
    pub overall_statistics: OverallStatistics,
}

impl BatchSummary {
    pub fn new(timestamp: String, subject_details: Vec<(String, SubjectOutcome)>) -> Self {
        let mut total_questions_processed = 0;
        let mut total_unique_concepts = 0;
        let mut successful_subjects = 0;
        for (_, outcome) in &subject_details {
            if let SubjectOutcome::Success(stats) = outcome {
                successful_subjects += 1;
                total_questions_processed += stats.total_questions;
                total_unique_concepts += stats.unique_concepts_count;
            }
        }
        Self {
            timestamp,
            total_subjects_processed: subject_details.len(),
            successful_subjects,
            failed_subjects: subject_details.len() - successful_subjects,
            overall_statistics: OverallStatistics {
                total_questions_processed,
                total_unique_concepts,
                average_concepts_per_subject: total_unique_concepts as f64
                    / successful_subjects.max(1) as f64,
            },
            subject_details,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.subject_details.iter().filter_map(|(subject, outcome)| match outcome {
            SubjectOutcome::Failure { error } => Some((subject.as_str(), error.as_str())),
            SubjectOutcome::Success(_) => None,
        })
    }
}

/// Runs one extraction method over many subjects.
pub struct BatchProcessor<'a> {
    config: &'a ProjectConfig,
    method: ExtractionMethod,
    output_dir: PathBuf,
}

impl<'a> BatchProcessor<'a> {
    /// Write into the configured batch output directory.
    pub fn new(config: &'a ProjectConfig, method: ExtractionMethod) -> Self {
        Self {
            config,
            method,
            output_dir: config.directories.batch_output_dir.clone(),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Read, extract and summarize one subject.
    pub fn process_subject(&self, subject: &str) -> ConceptResult<(Vec<ExtractedQuestion>, SubjectStatistics)> {
        let dirs = &self.config.directories;
        let questions_file = dirs.questions_file(subject);
        let questions = read_questions(&questions_file)?;
        if questions.is_empty() {
            return Err(QuestionError::Empty {
                path: questions_file.display().to_string(),
            }
            .into());
        }

        let dictionary = dirs.dictionary_file(subject);
        let extractor = build_extractor(
            self.method,
            &self.config.extraction,
            &self.config.llm,
            Some(dictionary.as_path()).filter(|p| p.exists()),
        )?;

        let start = Instant::now();
        let rows = extract_questions(extractor.as_ref(), &questions);
        let stats = SubjectStatistics::compute(&rows, start.elapsed());
        tracing::info!(
            subject,
            extractor = extractor.name(),
            questions = stats.total_questions,
            coverage = stats.coverage_percentage,
            "subject processed"
        );
        Ok((rows, stats))
    }

    /// Process `subjects` (or every discovered subject) and write the
    /// per-subject CSVs plus the batch summary.
    pub fn run(&self, subjects: Option<&[String]>) -> ConceptResult<BatchSummary> {
        let subjects = match subjects {
            Some(list) => list.to_vec(),
            None => discover_subjects(&self.config.directories.resources_dir),
        };
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();

        let mut details = Vec::with_capacity(subjects.len());
        for subject in subjects {
            tracing::info!(subject = %subject, "processing subject");
            let outcome = match self.run_subject(&subject, &timestamp) {
                Ok(stats) => SubjectOutcome::Success(stats),
                Err(e) => {
                    tracing::error!(subject = %subject, error = %e, "subject failed");
                    SubjectOutcome::Failure { error: e.to_string() }
                }
            };
            details.push((subject, outcome));
        }

        let summary = BatchSummary::new(timestamp, details);
        let summary_file = self
            .output_dir
            .join(format!("batch_summary_{}.json", summary.timestamp));
        report::write_json(&summary_file, &summary)?;
        Ok(summary)
    }

    fn run_subject(&self, subject: &str, timestamp: &str) -> ConceptResult<SubjectStatistics> {
        let (rows, stats) = self.process_subject(subject)?;
        let output = self.output_dir.join(format!("{subject}_concepts_{timestamp}.csv"));
        report::write_csv(&output, &rows)?;
        Ok(stats)
    }
}
