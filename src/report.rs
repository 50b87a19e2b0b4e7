//! Per-question results, subject statistics and their CSV/JSON renderings.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::{ReportError, ReportResult};
use crate::extractor::ConceptExtractor;
use crate::questions::Question;
use crate::tabular;

/// Separator between concepts in a CSV cell.
pub const CONCEPT_SEPARATOR: &str = "; ";

/// Header of the per-subject concepts CSV.
pub const CSV_HEADER: [&str; 3] = ["Question Number", "Question", "Concepts"];

/// Concepts assigned to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedQuestion {
    pub number: String,
    pub question: String,
    pub concepts: Vec<String>,
}

impl ExtractedQuestion {
    pub fn concepts_cell(&self) -> String {
        self.concepts.join(CONCEPT_SEPARATOR)
    }

    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }
}

/// Run `extractor` over every question, keeping question order.
pub fn extract_questions(extractor: &dyn ConceptExtractor, questions: &[Question]) -> Vec<ExtractedQuestion> {
    let texts: Vec<String> = questions.iter().map(|q| q.text.clone()).collect();
    extractor
        .extract_batch(&texts)
        .into_iter()
        .zip(questions)
        .map(|(concepts, q)| ExtractedQuestion {
            number: q.number.clone(),
            question: q.text.clone(),
            concepts,
        })
        .collect()
}

/// `(concept, count)` pairs, most frequent first. Serializes as a JSON object
/// in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptCounts(pub Vec<(String, usize)>);

impl ConceptCounts {
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(c, n)| (c.as_str(), *n))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ConceptCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_pairs(&self.0, serializer)
    }
}

/// Serialize `(key, value)` pairs as a JSON object, keeping their order.
#[allow(clippy::ptr_arg)]
pub fn serialize_pairs<S, V>(pairs: &Vec<(String, V)>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (key, value) in pairs {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

/// Occurrence count of every concept, in first-seen order.
pub fn concept_frequency<'a>(concepts: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    for concept in concepts {
        match index.get(concept) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                index.insert(concept, counts.len());
                counts.push((concept.to_string(), 1));
            }
        }
    }
    counts
}

/// The `n` most frequent concepts; ties keep first-seen order.
pub fn most_common<'a>(concepts: impl IntoIterator<Item = &'a str>, n: usize) -> ConceptCounts {
    let mut counts = concept_frequency(concepts);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    ConceptCounts(counts)
}

fn all_concepts(rows: &[ExtractedQuestion]) -> impl Iterator<Item = &str> {
    rows.iter().flat_map(|r| r.concepts.iter().map(String::as_str))
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Summary of one subject's extraction run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectStatistics {
    pub total_questions: usize,
    pub questions_with_concepts: usize,
    pub coverage_percentage: f64,
    pub processing_time_seconds: f64,
    pub unique_concepts_count: usize,
    pub most_common_concepts: ConceptCounts,
}

impl SubjectStatistics {
    pub fn compute(rows: &[ExtractedQuestion], elapsed: Duration) -> Self {
        let total_questions = rows.len();
        let questions_with_concepts = rows.iter().filter(|r| !r.concepts.is_empty()).count();
        let frequency = concept_frequency(all_concepts(rows));
        Self {
            total_questions,
            questions_with_concepts,
            coverage_percentage: percentage(questions_with_concepts, total_questions),
            processing_time_seconds: elapsed.as_secs_f64(),
            unique_concepts_count: frequency.len(),
            most_common_concepts: most_common(all_concepts(rows), 10),
        }
    }
}

/// Detailed analytics for one subject run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub subject: String,
    pub extraction_method: String,
    pub processing_time_seconds: f64,
    pub total_questions: usize,
    pub questions_with_concepts: usize,
    pub coverage_percentage: f64,
    pub concept_frequency: ConceptCounts,
    pub timestamp: String,
    pub avg_concepts_per_question: f64,
    pub max_concepts_single_question: usize,
    pub min_concepts_single_question: usize,
}

impl Analytics {
    pub fn compute(subject: &str, method: &str, rows: &[ExtractedQuestion], elapsed: Duration) -> Self {
        let stats = SubjectStatistics::compute(rows, elapsed);
        let counts: Vec<usize> = rows.iter().map(ExtractedQuestion::concept_count).collect();
        let total: usize = counts.iter().sum();
        Self {
            subject: subject.to_string(),
            extraction_method: method.to_string(),
            processing_time_seconds: stats.processing_time_seconds,
            total_questions: stats.total_questions,
            questions_with_concepts: stats.questions_with_concepts,
            coverage_percentage: stats.coverage_percentage,
            concept_frequency: stats.most_common_concepts,
            timestamp: chrono::Local::now().to_rfc3339(),
            avg_concepts_per_question: if rows.is_empty() { 0.0 } else { total as f64 / rows.len() as f64 },
            max_concepts_single_question: counts.iter().copied().max().unwrap_or(0),
            min_concepts_single_question: counts.iter().copied().min().unwrap_or(0),
        }
    }
}

/// Render rows as the per-subject concepts CSV.
pub fn render_csv(rows: &[ExtractedQuestion]) -> ReportResult<String> {
    let records = rows
        .iter()
        .map(|row| vec![row.number.clone(), row.question.clone(), row.concepts_cell()]);
    tabular::render(&CSV_HEADER, records).map_err(|e| ReportError::Serialize {
        message: e.to_string(),
    })
}

pub fn write_csv(path: &Path, rows: &[ExtractedQuestion]) -> ReportResult<()> {
    write_file(path, &render_csv(rows)?)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote concepts CSV");
    Ok(())
}

/// JSON object keyed by question number, in question order.
pub fn questions_json(rows: &[ExtractedQuestion]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for row in rows {
        map.insert(
            row.number.clone(),
            serde_json::json!({
                "question": row.question,
                "concepts": row.concepts,
                "concept_count": row.concept_count(),
            }),
        );
    }
    serde_json::Value::Object(map)
}

/// Pretty-print any serializable report to `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ReportResult<()> {
    let content = serde_json::to_string_pretty(value).map_err(|e| ReportError::Serialize {
        message: e.to_string(),
    })?;
    write_file(path, &content)?;
    tracing::info!(path = %path.display(), "wrote JSON report");
    Ok(())
}

fn write_file(path: &Path, content: &str) -> ReportResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ReportError::Write {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    std::fs::write(path, content).map_err(|e| ReportError::Write {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(n: &str, concepts: &[&str]) -> ExtractedQuestion {
        ExtractedQuestion {
            number: n.into(),
            question: format!("Question {n}, with a comma"),
            concepts: concepts.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    #[test]
    fn frequency_ties_keep_first_seen_order() {
        let top = most_common(["B", "A", "A", "C", "B", "D"], 3);
        assert_eq!(
            top.0,
            vec![("B".to_string(), 2), ("A".to_string(), 2), ("C".to_string(), 1)]
        );
    }

    #[test]
    fn statistics_cover_questions_and_uniques() {
        let rows = vec![
            row("1", &["Gupta Period", "Temple Architecture"]),
            row("2", &[]),
            row("3", &["Gupta Period"]),
            row("4", &["Vedic Period"]),
        ];
        let stats = SubjectStatistics::compute(&rows, Duration::from_millis(1500));
        assert_eq!(stats.total_questions, 4);
        assert_eq!(stats.questions_with_concepts, 3);
        assert_eq!(stats.coverage_percentage, 75.0);
        assert_eq!(stats.unique_concepts_count, 3);
        assert_eq!(stats.processing_time_seconds, 1.5);
        assert_eq!(stats.most_common_concepts.0[0], ("Gupta Period".to_string(), 2));
    }

    #[test]
    fn empty_run_has_zero_coverage() {
        let stats = SubjectStatistics::compute(&[], Duration::ZERO);
        assert_eq!(stats.coverage_percentage, 0.0);
        let analytics = Analytics::compute("x", "Hybrid Extractor", &[], Duration::ZERO);
        assert_eq!(analytics.max_concepts_single_question, 0);
    }

    #[test]
    fn analytics_min_max_average() {
        let rows = vec![row("1", &["A", "B", "C"]), row("2", &["A"])];
        let a = Analytics::compute("economics", "Hybrid Extractor", &rows, Duration::ZERO);
        assert_eq!(a.max_concepts_single_question, 3);
        assert_eq!(a.min_concepts_single_question, 1);
        assert_eq!(a.avg_concepts_per_question, 2.0);
    }

    #[test]
    fn csv_joins_concepts_and_escapes() {
        let csv = render_csv(&[row("7", &["Monetary Policy", "Inflation"])]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Question Number,Question,Concepts"));
        assert_eq!(
            lines.next(),
            Some("7,\"Question 7, with a comma\",Monetary Policy; Inflation")
        );
    }

    #[test]
    fn json_is_keyed_by_number_in_order() {
        let value = questions_json(&[row("10", &["A"]), row("2", &[])]);
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["10", "2"]);
        assert_eq!(value["10"]["concept_count"], 1);
        assert_eq!(value["2"]["concepts"], serde_json::json!([]));
    }

    #[test]
    fn concept_counts_serialize_as_ordered_object() {
        let json = serde_json::to_string(&most_common(["Z", "A", "Z"], 10)).unwrap();
        assert_eq!(json, r#"{"Z":2,"A":1}"#);
    }

    #[test]
    fn writers_create_parent_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out").join("history.json");
        write_json(&path, &questions_json(&[row("1", &["A"])])).unwrap();
        assert!(path.exists());
    }
}
