use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use tracing::{info, warn};

use super::csv_reader::CsvRow;
use super::import_store::{ImportStore, NewStudent};
use crate::core::error::Result;

const MAX_TEXT_LEN: usize = 100;

/// Counts and messages of one import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub total: usize,
    pub success_count: usize,
    /// One message per failed row
    pub errors: Vec<String>,
}

impl ImportOutcome {
    pub fn failure_count(&self) -> usize {
        self.errors.len()
    }
}

/// A row whose fields all parsed
struct ValidRow {
    student_name: String,
    student_id: i64,
    programm: String,
    degree_obtained: String,
    issuer_name: String,
    issue_date: Option<DateTime<Utc>>,
}

fn row_label(row: &CsvRow) -> String {
    match &row.student_name {
        Some(name) => format!("Row {} ({})", row.number, name),
        None => format!("Row {}", row.number),
    }
}

fn required_text(row: &CsvRow, field: &str, value: &Option<String>) -> std::result::Result<String, String> {
    let value = value
        .as_ref()
        .ok_or_else(|| format!("{}: missing required field '{}'.", row_label(row), field))?;

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(format!(
            "{}: '{}' must be at most {} characters.",
            row_label(row),
            field,
            MAX_TEXT_LEN
        ));
    }
    Ok(value.clone())
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC)
fn parse_issue_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn validate_row(row: &CsvRow) -> std::result::Result<ValidRow, String> {
    let student_name = required_text(row, "student_name", &row.student_name)?;
    let raw_id = required_text(row, "student_id", &row.student_id)?;
    let programm = required_text(row, "programm", &row.programm)?;
    let degree_obtained = required_text(row, "degree_obtained", &row.degree_obtained)?;
    let issuer_name = required_text(row, "issuer_name_en", &row.issuer_name_en)?;

    let student_id = raw_id
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| format!("{}: invalid student_id '{}'.", row_label(row), raw_id))?;

    let issue_date = match row.issue_date.as_deref() {
        Some(raw) => Some(parse_issue_date(raw).ok_or_else(|| {
            format!("{}: invalid issue_date '{}'.", row_label(row), raw)
        })?),
        None => None,
    };

    Ok(ValidRow {
        student_name,
        student_id,
        programm,
        degree_obtained,
        issuer_name,
        issue_date,
    })
}

/// Insert every row through `store`, collecting one message per rejected row.
///
/// A rejected row never stops the run. Errors returned by the store itself
/// abort the run and are propagated.
pub async fn run_import<S>(
    store: &mut S,
    rows: &[CsvRow],
    create_missing_issuers: bool,
) -> Result<ImportOutcome>
where
    S: ImportStore + ?Sized,
{
    let mut outcome = ImportOutcome {
        total: rows.len(),
        ..Default::default()
    };
    let mut issuer_ids: HashMap<String, i64> = HashMap::new();

    for row in rows {
        let valid = match validate_row(row) {
            Ok(valid) => valid,
            Err(message) => {
                warn!("Import row rejected: {}", message);
                outcome.errors.push(message);
                continue;
            }
        };

        let issuer_id = match issuer_ids.get(&valid.issuer_name) {
            Some(id) => *id,
            None => {
                let id = match store.find_issuer_by_name(&valid.issuer_name).await? {
                    Some(id) => id,
                    None if create_missing_issuers => {
                        let id = store.create_issuer(&valid.issuer_name).await?;
                        info!("Issuer created during import: id={}, name={}", id, valid.issuer_name);
                        id
                    }
                    None => {
                        let message = format!(
                            "{}: issuer '{}' does not exist.",
                            row_label(row),
                            valid.issuer_name
                        );
                        warn!("Import row rejected: {}", message);
                        outcome.errors.push(message);
                        continue;
                    }
                };
                issuer_ids.insert(valid.issuer_name.clone(), id);
                id
            }
        };

        let student = NewStudent {
            student_name: valid.student_name,
            student_id: valid.student_id,
            programm: valid.programm,
            degree_obtained: valid.degree_obtained,
            issuer_id,
            issue_date: valid.issue_date,
        };

        match store.insert_student(&student).await? {
            Some(_) => outcome.success_count += 1,
            None => {
                let message = format!(
                    "{}: duplicate student_id {}. A student with this ID already exists.",
                    row_label(row),
                    student.student_id
                );
                warn!("Import row rejected: {}", message);
                outcome.errors.push(message);
            }
        }
    }

    info!(
        "Import finished: {} rows, {} imported, {} failed",
        outcome.total,
        outcome.success_count,
        outcome.failure_count()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fake::faker::name::en::Name;
    use fake::Fake;

    /// In-memory store with the same uniqueness rules as the database
    #[derive(Default)]
    struct MemoryImportStore {
        issuers: Vec<(i64, String)>,
        students: Vec<(i64, NewStudent)>,
    }

    impl MemoryImportStore {
        fn with_issuer(name: &str) -> Self {
            Self {
                issuers: vec![(1, name.to_string())],
                students: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl ImportStore for MemoryImportStore {
        async fn find_issuer_by_name(&mut self, name: &str) -> Result<Option<i64>> {
            Ok(self
                .issuers
                .iter()
                .find(|(_, issuer)| issuer == name)
                .map(|(id, _)| *id))
        }

        async fn create_issuer(&mut self, name: &str) -> Result<i64> {
            let id = self.issuers.len() as i64 + 1;
            self.issuers.push((id, name.to_string()));
            Ok(id)
        }

        async fn insert_student(&mut self, student: &NewStudent) -> Result<Option<i64>> {
            if self
                .students
                .iter()
                .any(|(_, s)| s.student_id == student.student_id)
            {
                return Ok(None);
            }
            let id = self.students.len() as i64 + 1;
            self.students.push((id, student.clone()));
            Ok(Some(id))
        }
    }

    fn row(number: usize, fields: [&str; 5]) -> CsvRow {
        let cell = |v: &str| (!v.is_empty()).then(|| v.to_string());
        CsvRow {
            number,
            student_name: cell(fields[0]),
            student_id: cell(fields[1]),
            programm: cell(fields[2]),
            degree_obtained: cell(fields[3]),
            issuer_name_en: cell(fields[4]),
            issue_date: None,
        }
    }

    #[tokio::test]
    async fn test_valid_row_links_existing_issuer() {
        let mut store = MemoryImportStore::with_issuer("Acme U");
        let rows = [row(1, ["Jane Doe", "1001", "CS", "BSc", "Acme U"])];

        let outcome = run_import(&mut store, &rows, false).await.unwrap();

        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.failure_count(), 0);
        assert_eq!(store.students.len(), 1);
        let (_, student) = &store.students[0];
        assert_eq!(student.student_name, "Jane Doe");
        assert_eq!(student.student_id, 1001);
        assert_eq!(student.issuer_id, 1);
        assert_eq!(student.issue_date, None);
    }

    #[tokio::test]
    async fn test_duplicate_student_id_fails_row_and_keeps_original() {
        let mut store = MemoryImportStore::with_issuer("Acme U");
        run_import(
            &mut store,
            &[row(1, ["Jane Doe", "1001", "CS", "BSc", "Acme U"])],
            false,
        )
        .await
        .unwrap();

        let outcome = run_import(
            &mut store,
            &[
                row(1, ["Someone Else", "1001", "Math", "MSc", "Acme U"]),
                row(2, ["John Roe", "1002", "Math", "MSc", "Acme U"]),
            ],
            false,
        )
        .await
        .unwrap();

        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.failure_count(), 1);
        assert!(outcome.errors[0].starts_with("Row 1 (Someone Else)"));
        assert!(outcome.errors[0].contains("already exists"));

        let (_, original) = &store.students[0];
        assert_eq!(original.student_name, "Jane Doe");
        assert_eq!(original.programm, "CS");
        assert_eq!(store.students.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_issuer_strict_and_lenient() {
        let rows = [row(1, ["Jane Doe", "1001", "CS", "BSc", "Nowhere U"])];

        let mut strict = MemoryImportStore::with_issuer("Acme U");
        let outcome = run_import(&mut strict, &rows, false).await.unwrap();
        assert_eq!(outcome.failure_count(), 1);
        assert!(outcome.errors[0].contains("issuer 'Nowhere U' does not exist"));
        assert!(strict.students.is_empty());
        assert_eq!(strict.issuers.len(), 1);

        let mut lenient = MemoryImportStore::with_issuer("Acme U");
        let outcome = run_import(&mut lenient, &rows, true).await.unwrap();
        assert_eq!(outcome.success_count, 1);
        assert_eq!(lenient.issuers.len(), 2);
        assert_eq!(lenient.students[0].1.issuer_id, 2);
    }

    #[tokio::test]
    async fn test_missing_issuer_created_once_per_run() {
        let rows = [
            row(1, ["A", "1", "CS", "BSc", "New U"]),
            row(2, ["B", "2", "CS", "BSc", "New U"]),
        ];
        let mut store = MemoryImportStore::default();

        let outcome = run_import(&mut store, &rows, true).await.unwrap();

        assert_eq!(outcome.success_count, 2);
        assert_eq!(store.issuers.len(), 1);
    }

    #[tokio::test]
    async fn test_row_level_field_errors() {
        let mut store = MemoryImportStore::with_issuer("Acme U");
        let rows = [
            row(1, ["", "1", "CS", "BSc", "Acme U"]),
            row(2, ["Jane", "abc", "CS", "BSc", "Acme U"]),
            row(3, ["John", "-4", "CS", "BSc", "Acme U"]),
            row(4, ["Ann", "5", "", "BSc", "Acme U"]),
        ];

        let outcome = run_import(&mut store, &rows, false).await.unwrap();

        assert_eq!(outcome.success_count, 0);
        assert_eq!(outcome.errors.len(), 4);
        assert_eq!(outcome.errors[0], "Row 1: missing required field 'student_name'.");
        assert_eq!(outcome.errors[1], "Row 2 (Jane): invalid student_id 'abc'.");
        assert_eq!(outcome.errors[2], "Row 3 (John): invalid student_id '-4'.");
        assert_eq!(outcome.errors[3], "Row 4 (Ann): missing required field 'programm'.");
    }

    #[tokio::test]
    async fn test_issue_date_column() {
        let mut store = MemoryImportStore::with_issuer("Acme U");
        let mut dated = row(1, ["Jane", "1", "CS", "BSc", "Acme U"]);
        dated.issue_date = Some("2024-05-01".to_string());
        let mut stamped = row(2, ["John", "2", "CS", "BSc", "Acme U"]);
        stamped.issue_date = Some("2023-01-02T10:00:00+02:00".to_string());
        let mut bad = row(3, ["Ann", "3", "CS", "BSc", "Acme U"]);
        bad.issue_date = Some("May 1st".to_string());

        let outcome = run_import(&mut store, &[dated, stamped, bad], false)
            .await
            .unwrap();

        assert_eq!(outcome.success_count, 2);
        assert_eq!(
            store.students[0].1.issue_date.map(|d| d.to_rfc3339()),
            Some("2024-05-01T00:00:00+00:00".to_string())
        );
        assert_eq!(
            store.students[1].1.issue_date.map(|d| d.to_rfc3339()),
            Some("2023-01-02T08:00:00+00:00".to_string())
        );
        assert!(outcome.errors[0].contains("invalid issue_date"));
    }

    #[tokio::test]
    async fn test_every_unique_row_is_inserted() {
        let mut store = MemoryImportStore::with_issuer("Acme U");
        let rows: Vec<CsvRow> = (1..=25)
            .map(|n| {
                let name: String = Name().fake();
                let id = (5000 + n).to_string();
                row(n, [name.as_str(), id.as_str(), "CS", "BSc", "Acme U"])
            })
            .collect();

        let outcome = run_import(&mut store, &rows, false).await.unwrap();

        assert_eq!(outcome.total, 25);
        assert_eq!(outcome.success_count, 25);
        assert_eq!(store.students.len(), 25);
    }
}
