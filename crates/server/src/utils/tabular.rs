//! Tabular upload parsing and artifact writing
//!
//! Uploads arrive as CSV or XLSX. A `query` column is required (detected by
//! header; headerless files fall back to positional columns), `location` is
//! optional. Output artifacts are CSV with the full canonical header; null
//! fields render empty.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use thiserror::Error;

use enrich::CanonicalRecord;

#[derive(Debug, Error)]
pub enum TabularError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("The uploaded file contains no rows")]
    Empty,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One uploaded input row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRow {
    pub query: String,
    pub location: Option<String>,
}

/// Column indices for query and location, resolved from a header row when
/// one is present.
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    query: usize,
    location: Option<usize>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            query: 0,
            location: Some(1),
        }
    }
}

impl ColumnLayout {
    /// Detect a header row. Returns `None` when the row is data.
    fn from_header(cells: &[String]) -> Option<Self> {
        let query = cells
            .iter()
            .position(|c| c.eq_ignore_ascii_case("query"))?;
        let location = cells
            .iter()
            .position(|c| c.eq_ignore_ascii_case("location"));
        Some(Self { query, location })
    }

    fn extract(&self, cells: &[String]) -> Option<QueryRow> {
        let query = cells.get(self.query)?.trim().to_string();
        if query.is_empty() {
            return None;
        }
        let location = self
            .location
            .and_then(|i| cells.get(i))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Some(QueryRow { query, location })
    }
}

/// Parse an uploaded file into query rows, dispatching on the extension.
pub fn parse_rows(file_name: &str, bytes: &[u8]) -> Result<Vec<QueryRow>, TabularError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "csv" => parse_csv(bytes)?,
        "xlsx" | "xls" => parse_xlsx(bytes)?,
        other => return Err(TabularError::UnsupportedFormat(other.to_string())),
    };

    if rows.is_empty() {
        return Err(TabularError::Empty);
    }
    Ok(rows)
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<QueryRow>, TabularError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut layout = ColumnLayout::default();
    let mut rows = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(ToString::to_string).collect();

        if index == 0 {
            if let Some(detected) = ColumnLayout::from_header(&cells) {
                layout = detected;
                continue;
            }
        }

        if let Some(row) = layout.extract(&cells) {
            rows.push(row);
        }
    }

    Ok(rows)
}

fn parse_xlsx(bytes: &[u8]) -> Result<Vec<QueryRow>, TabularError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes.to_vec()))?;
    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Ok(Vec::new());
    };
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut layout = ColumnLayout::default();
    let mut rows = Vec::new();

    for (index, row) in range.rows().enumerate() {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();

        if index == 0 {
            if let Some(detected) = ColumnLayout::from_header(&cells) {
                layout = detected;
                continue;
            }
        }

        if let Some(row) = layout.extract(&cells) {
            rows.push(row);
        }
    }

    Ok(rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Write enrichment results as the downloadable CSV artifact.
///
/// Header is the fixed canonical column set; a failed row renders as an
/// all-empty line so output rows stay aligned 1:1 with input rows.
pub fn write_records(
    path: &Path,
    records: &[Option<CanonicalRecord>],
) -> Result<(), TabularError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CanonicalRecord::COLUMNS)?;

    for record in records {
        match record {
            Some(record) => writer.write_record(record_fields(record))?,
            None => writer.write_record(vec![""; CanonicalRecord::COLUMNS.len()])?,
        }
    }

    writer.flush()?;
    Ok(())
}

fn record_fields(record: &CanonicalRecord) -> Vec<String> {
    fn text(value: &Option<String>) -> String {
        value.clone().unwrap_or_default()
    }

    vec![
        text(&record.entreprise_name),
        text(&record.business_type),
        text(&record.phone_number),
        text(&record.address),
        text(&record.website),
        record.stars_count.map(|v| v.to_string()).unwrap_or_default(),
        record
            .reviews_count
            .map(|v| v.to_string())
            .unwrap_or_default(),
        text(&record.siren_number),
        text(&record.siret_number),
        text(&record.naf_code),
        text(&record.activite_principale),
        text(&record.employees_count),
        text(&record.full_name),
        text(&record.email_address),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_with_header() {
        let bytes = b"query,location\nACME SAS,Paris\n123456789,\n";
        let rows = parse_rows("input.csv", bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].query, "ACME SAS");
        assert_eq!(rows[0].location.as_deref(), Some("Paris"));
        assert_eq!(rows[1].query, "123456789");
        assert!(rows[1].location.is_none());
    }

    #[test]
    fn test_parse_csv_reordered_header() {
        let bytes = b"location,query\nLyon,ACME SAS\n";
        let rows = parse_rows("input.csv", bytes).unwrap();
        assert_eq!(rows[0].query, "ACME SAS");
        assert_eq!(rows[0].location.as_deref(), Some("Lyon"));
    }

    #[test]
    fn test_parse_csv_without_header_uses_positions() {
        let bytes = b"ACME SAS,Paris\nGlobex,\n";
        let rows = parse_rows("input.csv", bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].query, "ACME SAS");
        assert_eq!(rows[1].query, "Globex");
    }

    #[test]
    fn test_parse_skips_blank_queries() {
        let bytes = b"query,location\n,Paris\nACME,\n";
        let rows = parse_rows("input.csv", bytes).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].query, "ACME");
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let result = parse_rows("input.pdf", b"whatever");
        assert!(matches!(result, Err(TabularError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_empty_file_rejected() {
        let result = parse_rows("input.csv", b"");
        assert!(matches!(result, Err(TabularError::Empty)));
    }

    #[test]
    fn test_write_records_renders_nulls_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let found = CanonicalRecord {
            entreprise_name: Some("ACME SAS".to_string()),
            phone_number: Some("0102030405".to_string()),
            stars_count: Some(4.5),
            ..Default::default()
        };
        write_records(&path, &[Some(found), None]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            CanonicalRecord::COLUMNS.join(",")
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("ACME SAS,"));
        assert!(first.contains("4.5"));
        // The failed row is present and aligned, all fields empty
        let second = lines.next().unwrap();
        assert_eq!(second.matches(',').count(), CanonicalRecord::COLUMNS.len() - 1);
        assert!(second.chars().all(|c| c == ','));
    }
}
