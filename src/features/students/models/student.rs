use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Select list producing a [`StudentRecord`]; append `WHERE`/`ORDER BY` as needed
pub const STUDENT_RECORD_SELECT: &str = r#"
    SELECT s.id, s.student_name, s.student_id, s.programm, s.degree_obtained,
           s.issuer_id, s.template_id, s.issue_date, s.qr_code_link,
           i.name_en AS issuer_name, i.uuid AS issuer_uuid
    FROM students s
    JOIN issuers i ON i.id = s.issuer_id
"#;

/// Student row joined with its issuer's display fields
#[derive(Debug, Clone, FromRow)]
pub struct StudentRecord {
    pub id: i64,
    pub student_name: String,
    /// Institution-assigned identification number, unique across all students
    pub student_id: i64,
    pub programm: String,
    pub degree_obtained: String,
    pub issuer_id: i64,
    pub template_id: Option<i64>,
    /// Set once at insert
    pub issue_date: DateTime<Utc>,
    pub qr_code_link: Option<String>,
    pub issuer_name: String,
    pub issuer_uuid: Uuid,
}
