//! Exam question CSV input.

use std::path::Path;

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::error::{QuestionError, QuestionResult};
use crate::tabular::Table;

/// Columns every questions file must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Question Number",
    "Question",
    "Option A",
    "Option B",
    "Option C",
    "Option D",
    "Answer",
];

/// One multiple-choice exam question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub number: String,
    pub text: String,
    /// Options A to D, in order.
    pub options: [String; 4],
    pub answer: String,
}

/// Parse questions CSV text. `source` names the input in errors.
pub fn parse_questions(content: &str, source: &str) -> QuestionResult<Vec<Question>> {
    let table = Table::parse(content)
        .map_err(|e| QuestionError::Malformed {
            path: source.to_string(),
            message: e.to_string(),
        })?
        .ok_or_else(|| QuestionError::Empty {
            path: source.to_string(),
        })?;

    let missing = table.missing_columns(&REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(QuestionError::MissingColumns {
            path: source.to_string(),
            missing: missing.join(", "),
        });
    }

    // Every required column is present, so these lookups cannot miss.
    let col: Vec<usize> = REQUIRED_COLUMNS
        .iter()
        .filter_map(|name| table.column(name))
        .collect();
    let cell = |record: &StringRecord, i: usize| record.get(col[i]).unwrap_or_default().to_string();

    let mut questions = Vec::new();
    for (line, record) in table.records().iter().enumerate() {
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != table.width() {
            tracing::warn!(
                source,
                record = line + 1,
                fields = record.len(),
                expected = table.width(),
                "skipping malformed question row"
            );
            continue;
        }
        questions.push(Question {
            number: cell(record, 0),
            text: cell(record, 1),
            options: [cell(record, 2), cell(record, 3), cell(record, 4), cell(record, 5)],
            answer: cell(record, 6),
        });
    }
    Ok(questions)
}

/// Read a subject's questions file.
pub fn read_questions(path: &Path) -> QuestionResult<Vec<Question>> {
    let source = path.display().to_string();
    if !path.exists() {
        return Err(QuestionError::NotFound { path: source });
    }
    let content = std::fs::read_to_string(path).map_err(|e| QuestionError::Io {
        path: source.clone(),
        source: e,
    })?;
    let questions = parse_questions(&content, &source)?;
    tracing::info!(path = %source, questions = questions.len(), "loaded questions");
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Question Number,Question,Option A,Option B,Option C,Option D,Answer\n";

    #[test]
    fn parses_rows_with_quoted_commas() {
        let csv = format!(
            "{HEADER}1,\"Which dynasty built the Taj Mahal, and when?\",Mughal,Gupta,Maurya,Chola,A\n"
        );
        let qs = parse_questions(&csv, "mem").unwrap();
        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].text, "Which dynasty built the Taj Mahal, and when?");
        assert_eq!(qs[0].options[0], "Mughal");
        assert_eq!(qs[0].answer, "A");
    }

    #[test]
    fn bom_multiline_questions_and_padded_cells() {
        let csv = format!(
            "\u{feff}{HEADER} 4 ,\"Explain the \"\"drain of wealth\"\"\ntheory.\",a,b,c,d, C \n"
        );
        let qs = parse_questions(&csv, "mem").unwrap();
        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].number, "4");
        assert_eq!(qs[0].text, "Explain the \"drain of wealth\"\ntheory.");
        assert_eq!(qs[0].answer, "C");
    }

    #[test]
    fn blank_rows_dropped_and_ragged_rows_skipped() {
        let csv = format!("{HEADER},,,,,,\n2,Short row,A\n3,What is GDP?,a,b,c,d,B\n");
        let qs = parse_questions(&csv, "mem").unwrap();
        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].number, "3");
    }

    #[test]
    fn missing_columns_are_named() {
        let err = parse_questions("Question Number,Question\n1,x\n", "mem").unwrap_err();
        match err {
            QuestionError::MissingColumns { missing, .. } => {
                assert!(missing.contains("Option A"));
                assert!(missing.contains("Answer"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read_questions(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, QuestionError::NotFound { .. }));
    }

    #[test]
    fn empty_file_has_no_header() {
        assert!(matches!(parse_questions("", "mem"), Err(QuestionError::Empty { .. })));
    }
}
