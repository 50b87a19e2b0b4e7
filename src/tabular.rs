//! CSV access for dictionaries, questions and reports, over the `csv` crate.
//!
//! The first record is the header; lookups are by trimmed column name. Rows
//! may be ragged: callers decide what a short or long row means.

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

/// A parsed CSV table: header plus data records.
#[derive(Debug, Clone, Default)]
pub struct Table {
    header: StringRecord,
    records: Vec<StringRecord>,
}

impl Table {
    /// Parse CSV text. `Ok(None)` when there is no header record.
    pub fn parse(content: &str) -> Result<Option<Self>, csv::Error> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(content.as_bytes());

        let header = reader.headers()?.clone();
        if header.is_empty() {
            return Ok(None);
        }
        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Some(Self { header, records }))
    }

    pub fn header(&self) -> &StringRecord {
        &self.header
    }

    /// Position of a column by exact header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Names from `required` that the header lacks.
    pub fn missing_columns<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| self.column(name).is_none())
            .collect()
    }

    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }
}

/// Render a header and rows as CSV text, quoting only where needed.
pub fn render<H, R, F>(header: &[H], rows: R) -> Result<String, csv::Error>
where
    H: AsRef<[u8]>,
    R: IntoIterator<Item = Vec<F>>,
    F: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(content: &str) -> Table {
        Table::parse(content).unwrap().unwrap()
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        let t = table("a,b\n1,\"x, \"\"y\"\"\"\n");
        assert_eq!(t.records().len(), 1);
        assert_eq!(&t.records()[0][1], "x, \"y\"");
    }

    #[test]
    fn embedded_newlines_and_crlf() {
        let t = table("q,a\r\n\"line one\nline two\",B\r\n");
        assert_eq!(&t.records()[0][0], "line one\nline two");
        assert_eq!(&t.records()[0][1], "B");
    }

    #[test]
    fn ragged_rows_are_kept_for_the_caller() {
        let t = table("k,c\n,Concept\nkey\n");
        assert_eq!(t.records().len(), 2);
        assert_eq!(&t.records()[0][0], "");
        assert_eq!(t.records()[1].len(), 1);
        assert_eq!(t.width(), 2);
    }

    #[test]
    fn header_lookup_trims_and_strips_bom() {
        let t = table("\u{feff}keyword , concept\nharappan,Indus Valley Civilization");
        assert_eq!(t.column("keyword"), Some(0));
        assert_eq!(t.column("concept"), Some(1));
        assert!(t.missing_columns(&["keyword", "concept"]).is_empty());
        assert_eq!(t.missing_columns(&["Answer"]), vec!["Answer"]);
        assert_eq!(t.records().len(), 1);
    }

    #[test]
    fn empty_content_has_no_table() {
        assert!(Table::parse("").unwrap().is_none());
    }

    #[test]
    fn render_quotes_only_when_needed() {
        let out = render(&["n", "q", "c"], [vec!["1", "What is GDP, really?", "say \"hi\""]]).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("n,q,c"));
        assert_eq!(lines.next(), Some("1,\"What is GDP, really?\",\"say \"\"hi\"\"\""));

        let back = table(&out);
        assert_eq!(&back.records()[0][1], "What is GDP, really?");
    }
}
