use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::core::error::Result;

/// Student row ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub student_name: String,
    pub student_id: i64,
    pub programm: String,
    pub degree_obtained: String,
    pub issuer_id: i64,
    /// `None` lets the store stamp the current time
    pub issue_date: Option<DateTime<Utc>>,
}

/// Record access used by an import run
#[async_trait]
pub trait ImportStore: Send {
    /// Exact-name issuer lookup
    async fn find_issuer_by_name(&mut self, name: &str) -> Result<Option<i64>>;

    async fn create_issuer(&mut self, name: &str) -> Result<i64>;

    /// Insert a student; `None` when a row with the same identity or student_id exists
    async fn insert_student(&mut self, student: &NewStudent) -> Result<Option<i64>>;
}

/// [`ImportStore`] over an open transaction.
///
/// Duplicates are skipped with `ON CONFLICT DO NOTHING` so a rejected row
/// leaves the transaction usable for the rows after it.
pub struct PgImportStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgImportStore<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ImportStore for PgImportStore<'_> {
    async fn find_issuer_by_name(&mut self, name: &str) -> Result<Option<i64>> {
        let id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM issuers WHERE name_en = $1 ORDER BY id LIMIT 1")
                .bind(name)
                .fetch_optional(&mut *self.conn)
                .await?;
        Ok(id)
    }

    async fn create_issuer(&mut self, name: &str) -> Result<i64> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO issuers (name_en, uuid) VALUES ($1, $2) RETURNING id")
                .bind(name)
                .bind(Uuid::new_v4())
                .fetch_one(&mut *self.conn)
                .await?;
        Ok(id)
    }

    async fn insert_student(&mut self, student: &NewStudent) -> Result<Option<i64>> {
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO students
                (student_name, student_id, programm, degree_obtained, issuer_id, issue_date)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()))
            ON CONFLICT DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&student.student_name)
        .bind(student.student_id)
        .bind(&student.programm)
        .bind(&student.degree_obtained)
        .bind(student.issuer_id)
        .bind(student.issue_date)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(id)
    }
}
