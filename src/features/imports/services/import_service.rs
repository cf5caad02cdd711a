use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::csv_reader::{read_import_rows, sample_csv, CsvRow};
use super::import_runner::{run_import, ImportOutcome};
use super::import_store::PgImportStore;
use crate::core::config::ImportConfig;
use crate::core::error::{AppError, Result};
use crate::features::imports::dtos::{
    CsvUploadResponseDto, ImportReportDto, SampleCsvResponseDto,
};
use crate::features::imports::models::{CsvUpload, SampleCsv};
use crate::modules::storage::ObjectStorage;
use crate::shared::constants::{CSV_UPLOAD_PREFIX, SAMPLE_CSV_PREFIX};
use crate::shared::types::PaginationQuery;
use crate::shared::upload::{ensure_max_size, has_csv_extension, UploadedFile};

const CSV_UPLOAD_COLUMNS: &str = "id, file_key, original_filename, file_size, \
     create_missing_issuers, processed, total_records, successful_records, failed_records, \
     error_log, uploaded_at";

const SAMPLE_CSV_COLUMNS: &str = "id, file_key, original_filename, file_url, created_at";

/// Service for bulk student imports and their bookkeeping
pub struct ImportService {
    pool: PgPool,
    storage: Arc<dyn ObjectStorage>,
    config: ImportConfig,
}

impl ImportService {
    pub fn new(pool: PgPool, storage: Arc<dyn ObjectStorage>, config: ImportConfig) -> Self {
        Self {
            pool,
            storage,
            config,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.config.max_upload_bytes
    }

    /// Reject uploads that are not `.csv` files within the size limit
    fn check_csv_upload(&self, file: &UploadedFile) -> Result<()> {
        if !has_csv_extension(&file.file_name) {
            return Err(AppError::BadRequest(
                "File must be a CSV file (.csv).".to_string(),
            ));
        }
        ensure_max_size(file, self.config.max_upload_bytes)
    }

    /// Import students from an uploaded CSV file.
    ///
    /// The file is fully decoded before the transaction starts. Rows are then
    /// inserted in one transaction together with the bookkeeping row; a
    /// rejected row is reported and skipped while the others are committed.
    pub async fn import_csv(
        &self,
        file: UploadedFile,
        create_missing_issuers: Option<bool>,
    ) -> Result<ImportReportDto> {
        self.check_csv_upload(&file)?;
        let rows = read_import_rows(&file.data)?;
        let create_missing_issuers =
            create_missing_issuers.unwrap_or(self.config.create_missing_issuers);

        let file_key = format!("{}/{}.csv", CSV_UPLOAD_PREFIX, Uuid::new_v4());
        let file_size = file.data.len() as i64;
        self.storage.put(&file_key, file.data, "text/csv").await?;

        let committed = self
            .record_import(&rows, create_missing_issuers, &file_key, &file.file_name, file_size)
            .await;
        let (upload_id, outcome) = match committed {
            Ok(done) => done,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&file_key).await {
                    warn!("Failed to remove rolled back upload '{}': {}", file_key, cleanup);
                }
                return Err(e);
            }
        };

        info!(
            "CSV import {} committed: file={}, imported={}, failed={}",
            upload_id,
            file.file_name,
            outcome.success_count,
            outcome.failure_count()
        );

        Ok(ImportReportDto {
            upload_id,
            total_records: outcome.total,
            success_count: outcome.success_count,
            failure_count: outcome.failure_count(),
            create_missing_issuers,
            errors: outcome.errors,
        })
    }

    /// Insert the rows and the bookkeeping record in one transaction
    async fn record_import(
        &self,
        rows: &[CsvRow],
        create_missing_issuers: bool,
        file_key: &str,
        file_name: &str,
        file_size: i64,
    ) -> Result<(i64, ImportOutcome)> {
        let mut tx = self.pool.begin().await?;

        let outcome = {
            let mut store = PgImportStore::new(&mut *tx);
            run_import(&mut store, rows, create_missing_issuers).await?
        };

        let upload_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO csv_uploads
                (file_key, original_filename, file_size, create_missing_issuers, processed,
                 total_records, successful_records, failed_records, error_log)
            VALUES ($1, $2, $3, $4, TRUE, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(file_key)
        .bind(file_name)
        .bind(file_size)
        .bind(create_missing_issuers)
        .bind(outcome.total as i32)
        .bind(outcome.success_count as i32)
        .bind(outcome.failure_count() as i32)
        .bind(outcome.errors.join("\n"))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((upload_id, outcome))
    }

    /// CSV template offered to users preparing an import
    pub fn sample_file(&self) -> Result<Vec<u8>> {
        sample_csv()
    }

    pub async fn list_uploads(
        &self,
        query: &PaginationQuery,
    ) -> Result<(Vec<CsvUploadResponseDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM csv_uploads")
            .fetch_one(&self.pool)
            .await?;

        let uploads: Vec<CsvUpload> = sqlx::query_as(&format!(
            "SELECT {} FROM csv_uploads ORDER BY uploaded_at DESC, id DESC LIMIT $1 OFFSET $2",
            CSV_UPLOAD_COLUMNS
        ))
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((uploads.into_iter().map(Into::into).collect(), total))
    }

    /// Store an admin-provided sample file
    pub async fn upload_sample(&self, file: UploadedFile) -> Result<SampleCsvResponseDto> {
        self.check_csv_upload(&file)?;

        let file_key = format!("{}/{}.csv", SAMPLE_CSV_PREFIX, Uuid::new_v4());
        self.storage.put(&file_key, file.data, "text/csv").await?;
        let file_url = self.storage.public_url(&file_key);

        let sample: SampleCsv = sqlx::query_as(&format!(
            "INSERT INTO sample_csvs (file_key, original_filename, file_url) VALUES ($1, $2, $3) RETURNING {}",
            SAMPLE_CSV_COLUMNS
        ))
        .bind(&file_key)
        .bind(&file.file_name)
        .bind(&file_url)
        .fetch_one(&self.pool)
        .await?;

        info!("Sample CSV stored: id={}, key={}", sample.id, file_key);
        Ok(sample.into())
    }

    pub async fn list_samples(&self) -> Result<Vec<SampleCsvResponseDto>> {
        let samples: Vec<SampleCsv> = sqlx::query_as(&format!(
            "SELECT {} FROM sample_csvs ORDER BY created_at DESC, id DESC",
            SAMPLE_CSV_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(samples.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::shared::test_helpers::MemoryStorage;

    fn service(storage: Arc<MemoryStorage>) -> ImportService {
        ImportService::new(
            lazy_test_pool(),
            storage,
            ImportConfig {
                create_missing_issuers: false,
                max_upload_bytes: 5 * 1024 * 1024,
            },
        )
    }

    fn csv_file() -> UploadedFile {
        UploadedFile {
            file_name: "students.csv".to_string(),
            content_type: "text/csv".to_string(),
            data: b"student_name,student_id,programm,degree_obtained,issuer_name_en\n\
                    Jane Doe,1001,CS,BSc,Acme U\n"
                .to_vec(),
        }
    }

    #[tokio::test]
    async fn test_failed_transaction_removes_stored_upload() {
        let storage = Arc::new(MemoryStorage::default());

        let err = service(storage.clone())
            .import_csv(csv_file(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        assert!(storage.keys().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_file_is_never_stored() {
        let storage = Arc::new(MemoryStorage::default());
        let mut file = csv_file();
        file.data = b"name,id\nJane,1\n".to_vec();

        let err = service(storage.clone())
            .import_csv(file, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(storage.keys().is_empty());
    }
}
