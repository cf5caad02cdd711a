use sqlx::PgPool;
use tracing::info;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::students::dtos::{
    CreateStudentDto, StudentQueryParams, StudentResponseDto, UpdateStudentDto,
};
use crate::features::students::models::{StudentRecord, STUDENT_RECORD_SELECT};

const DUPLICATE_ID: &str = "A student with this ID already exists.";
const DUPLICATE_DETAILS: &str = "A student with these exact details already exists.";
const DUPLICATE_UPDATE: &str = "This update would result in a duplicate record or QR code link.";

/// Map unique violations to the message for the constraint that fired
fn student_db_error(e: sqlx::Error, fallback: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.constraint() {
            Some("students_student_id_key") => return AppError::Conflict(DUPLICATE_ID.to_string()),
            Some("students_identity_key") => {
                return AppError::Conflict(DUPLICATE_DETAILS.to_string())
            }
            Some("students_issuer_id_fkey") => {
                return AppError::BadRequest("Issuer does not exist.".to_string())
            }
            Some("students_template_id_fkey") => {
                return AppError::BadRequest("Certificate template does not exist.".to_string())
            }
            _ => {}
        }
    }
    handle_db_error(e, fallback)
}

/// Service for student record operations
pub struct StudentService {
    pool: PgPool,
    base_url: String,
}

impl StudentService {
    pub fn new(pool: PgPool, base_url: String) -> Self {
        Self { pool, base_url }
    }

    fn to_dto(&self, record: StudentRecord) -> StudentResponseDto {
        StudentResponseDto::from_record(record, &self.base_url)
    }

    /// Whether `student_id` is taken by a row other than `exclude_id`
    async fn student_id_taken(&self, student_id: i64, exclude_id: Option<i64>) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM students WHERE student_id = $1 AND ($2::bigint IS NULL OR id <> $2))",
        )
        .bind(student_id)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    /// Create a student; `issue_date` is set by the database
    pub async fn create(&self, dto: CreateStudentDto) -> Result<StudentResponseDto> {
        let same_details: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM students
                WHERE student_name = $1 AND student_id = $2 AND programm = $3
                  AND degree_obtained = $4 AND issuer_id = $5
            )
            "#,
        )
        .bind(&dto.student_name)
        .bind(dto.student_id)
        .bind(&dto.programm)
        .bind(&dto.degree_obtained)
        .bind(dto.issuer_id)
        .fetch_one(&self.pool)
        .await?;
        if same_details {
            return Err(AppError::Conflict(DUPLICATE_DETAILS.to_string()));
        }

        if self.student_id_taken(dto.student_id, None).await? {
            return Err(AppError::Conflict(DUPLICATE_ID.to_string()));
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO students (student_name, student_id, programm, degree_obtained, issuer_id, template_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&dto.student_name)
        .bind(dto.student_id)
        .bind(&dto.programm)
        .bind(&dto.degree_obtained)
        .bind(dto.issuer_id)
        .bind(dto.template_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| student_db_error(e, DUPLICATE_DETAILS))?;

        info!("Student created: id={}, student_id={}", id, dto.student_id);
        self.get_by_id(id).await
    }

    pub async fn find_record(&self, id: i64) -> Result<StudentRecord> {
        sqlx::query_as(&format!("{} WHERE s.id = $1", STUDENT_RECORD_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student with id {} not found", id)))
    }

    /// All students of an issuer, oldest first
    pub async fn list_for_issuer(&self, issuer_id: i64) -> Result<Vec<StudentRecord>> {
        let records: Vec<StudentRecord> = sqlx::query_as(&format!(
            "{} WHERE s.issuer_id = $1 ORDER BY s.id",
            STUDENT_RECORD_SELECT
        ))
        .bind(issuer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<StudentResponseDto> {
        let record = self.find_record(id).await?;
        Ok(self.to_dto(record))
    }

    /// List students newest first, optionally filtered by name/programme and issuer
    pub async fn list(&self, params: &StudentQueryParams) -> Result<(Vec<StudentResponseDto>, i64)> {
        let search_pattern = params.search_pattern();

        let filter = r#"
            WHERE ($1::text IS NULL OR s.student_name ILIKE $1 ESCAPE '\' OR s.programm ILIKE $1 ESCAPE '\')
              AND ($2::bigint IS NULL OR s.issuer_id = $2)
        "#;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM students s {}",
            filter
        ))
        .bind(&search_pattern)
        .bind(params.issuer_id)
        .fetch_one(&self.pool)
        .await?;

        let records: Vec<StudentRecord> = sqlx::query_as(&format!(
            "{} {} ORDER BY s.id DESC LIMIT $3 OFFSET $4",
            STUDENT_RECORD_SELECT, filter
        ))
        .bind(&search_pattern)
        .bind(params.issuer_id)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((records.into_iter().map(|r| self.to_dto(r)).collect(), total))
    }

    /// Update editable fields; `issue_date` and `qr_code_link` are left as they are
    pub async fn update(&self, id: i64, dto: UpdateStudentDto) -> Result<StudentResponseDto> {
        if let Some(student_id) = dto.student_id {
            if self.student_id_taken(student_id, Some(id)).await? {
                return Err(AppError::Conflict(DUPLICATE_ID.to_string()));
            }
        }

        let template_set = dto.template_id.is_some();
        let template_id = dto.template_id.flatten();

        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE students
            SET student_name = COALESCE($1, student_name),
                student_id = COALESCE($2, student_id),
                programm = COALESCE($3, programm),
                degree_obtained = COALESCE($4, degree_obtained),
                issuer_id = COALESCE($5, issuer_id),
                template_id = CASE WHEN $6 THEN $7 ELSE template_id END
            WHERE id = $8
            RETURNING id
            "#,
        )
        .bind(&dto.student_name)
        .bind(dto.student_id)
        .bind(&dto.programm)
        .bind(&dto.degree_obtained)
        .bind(dto.issuer_id)
        .bind(template_set)
        .bind(template_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| student_db_error(e, DUPLICATE_UPDATE))?;

        let id = updated.ok_or_else(|| AppError::NotFound(format!("Student with id {} not found", id)))?;
        info!("Student updated: id={}", id);
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Student with id {} not found", id)));
        }

        info!("Student deleted: id={}", id);
        Ok(())
    }
}
