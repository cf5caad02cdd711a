use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::issuers::IssuerService;
use crate::features::students::StudentService;
use crate::features::verification::dtos::{IssuerPageView, StudentPageView};

/// Read-only lookups behind the public verification pages
pub struct VerificationService {
    students: Arc<StudentService>,
    issuers: Arc<IssuerService>,
    base_url: String,
}

impl VerificationService {
    pub fn new(students: Arc<StudentService>, issuers: Arc<IssuerService>, base_url: String) -> Self {
        Self {
            students,
            issuers,
            base_url,
        }
    }

    pub async fn student(&self, id: i64) -> Result<StudentPageView> {
        let record = self.students.find_record(id).await?;
        Ok(StudentPageView::from_record(record, &self.base_url))
    }

    /// Issuer with every student it certified
    pub async fn issuer(&self, uuid: Uuid) -> Result<IssuerPageView> {
        let issuer = self.issuers.find_by_uuid(uuid).await?;
        let students = self
            .students
            .list_for_issuer(issuer.id)
            .await?
            .into_iter()
            .map(|record| StudentPageView::from_record(record, &self.base_url))
            .collect();

        Ok(IssuerPageView::new(issuer, students))
    }
}
