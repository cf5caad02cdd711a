//! Decoding of student import files.
//!
//! The whole file is decoded and its header checked before any row is
//! processed, so a malformed upload never reaches the database.

use csv::{ReaderBuilder, StringRecord, Trim, Writer};

use crate::core::error::{AppError, Result};

/// Columns every import file must carry
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "student_name",
    "student_id",
    "programm",
    "degree_obtained",
    "issuer_name_en",
];

const ISSUE_DATE_COLUMN: &str = "issue_date";

const SAMPLE_ROW: [&str; 5] = [
    "John Doe",
    "12345",
    "Computer Science",
    "Bachelor of Science",
    "University of Example",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One data row; blank cells and cells past the end of a short row are `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based data row number, header excluded
    pub number: usize,
    pub student_name: Option<String>,
    pub student_id: Option<String>,
    pub programm: Option<String>,
    pub degree_obtained: Option<String>,
    pub issuer_name_en: Option<String>,
    pub issue_date: Option<String>,
}

struct ColumnIndex {
    student_name: usize,
    student_id: usize,
    programm: usize,
    degree_obtained: usize,
    issuer_name_en: usize,
    issue_date: Option<usize>,
}

impl ColumnIndex {
    fn from_header(header: &StringRecord) -> Result<Self> {
        let position = |name: &str| header.iter().position(|h| h == name);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| position(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "CSV file is missing required columns: {}",
                missing.join(", ")
            )));
        }

        let required = |name: &str| position(name).unwrap_or_default();
        Ok(Self {
            student_name: required("student_name"),
            student_id: required("student_id"),
            programm: required("programm"),
            degree_obtained: required("degree_obtained"),
            issuer_name_en: required("issuer_name_en"),
            issue_date: position(ISSUE_DATE_COLUMN),
        })
    }

    fn row(&self, number: usize, record: &StringRecord) -> CsvRow {
        let cell = |index: usize| {
            record
                .get(index)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        CsvRow {
            number,
            student_name: cell(self.student_name),
            student_id: cell(self.student_id),
            programm: cell(self.programm),
            degree_obtained: cell(self.degree_obtained),
            issuer_name_en: cell(self.issuer_name_en),
            issue_date: self.issue_date.and_then(cell),
        }
    }
}

/// Decode an uploaded import file into rows.
///
/// Fails as a whole on invalid UTF-8, a missing header column or a record the
/// CSV parser cannot read.
pub fn read_import_rows(data: &[u8]) -> Result<Vec<CsvRow>> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let text = std::str::from_utf8(data).map_err(|_| {
        AppError::BadRequest("The uploaded file is not valid UTF-8 text.".to_string())
    })?;

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let header = reader
        .headers()
        .map_err(|e| AppError::BadRequest(format!("Could not read CSV header: {}", e)))?
        .clone();
    let columns = ColumnIndex::from_header(&header)?;

    reader
        .records()
        .enumerate()
        .map(|(index, record)| {
            let record = record.map_err(|e| {
                AppError::BadRequest(format!("Error processing CSV file: {}", e))
            })?;
            Ok(columns.row(index + 1, &record))
        })
        .collect()
}

/// Header plus one example row, offered as a download template
pub fn sample_csv() -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer
        .write_record(REQUIRED_COLUMNS)
        .and_then(|_| writer.write_record(SAMPLE_ROW))
        .map_err(|e| AppError::Internal(format!("Failed to write sample CSV: {}", e)))?;

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to write sample CSV: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "student_name,student_id,programm,degree_obtained,issuer_name_en";

    #[test]
    fn test_reads_rows_with_one_based_numbers() {
        let data = format!("{}\nJane Doe,1001,CS,BSc,Acme U\nJohn Roe,1002,Math,MSc,Acme U\n", HEADER);
        let rows = read_import_rows(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[0].student_name.as_deref(), Some("Jane Doe"));
        assert_eq!(rows[0].issuer_name_en.as_deref(), Some("Acme U"));
        assert_eq!(rows[1].number, 2);
        assert_eq!(rows[1].student_id.as_deref(), Some("1002"));
        assert_eq!(rows[1].issue_date, None);
    }

    #[test]
    fn test_strips_bom_and_reorders_columns() {
        let data = b"\xEF\xBB\xBFissuer_name_en,student_id,student_name,programm,degree_obtained,issue_date\nAcme U,7,Jane,CS,BSc,2024-05-01\n";
        let rows = read_import_rows(data).unwrap();

        assert_eq!(rows[0].student_name.as_deref(), Some("Jane"));
        assert_eq!(rows[0].student_id.as_deref(), Some("7"));
        assert_eq!(rows[0].issue_date.as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn test_missing_columns_rejected_before_rows() {
        let data = b"student_name,student_id\nJane,1\n";
        let err = read_import_rows(data).unwrap_err();

        match err {
            AppError::Validation(msg) => {
                assert!(msg.contains("programm"));
                assert!(msg.contains("issuer_name_en"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_short_and_blank_cells_become_none() {
        let data = format!("{}\nJane,  ,CS\n", HEADER);
        let rows = read_import_rows(data.as_bytes()).unwrap();

        assert_eq!(rows[0].student_id, None);
        assert_eq!(rows[0].degree_obtained, None);
        assert_eq!(rows[0].issuer_name_en, None);
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = read_import_rows(b"student_name\n\xFF\xFE\n").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_empty_file_reports_missing_columns() {
        let err = read_import_rows(b"").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_sample_csv_round_trips_through_reader() {
        let sample = sample_csv().unwrap();
        let rows = read_import_rows(&sample).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student_name.as_deref(), Some("John Doe"));
        assert_eq!(rows[0].issuer_name_en.as_deref(), Some("University of Example"));
    }
}
