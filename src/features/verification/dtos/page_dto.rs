use serde::Serialize;

use crate::features::issuers::models::Issuer;
use crate::features::students::models::StudentRecord;
use crate::shared::urls::issuer_verify_url;

const PAGE_DATE_FORMAT: &str = "%B %d, %Y";

/// Student fields shown on the public pages
#[derive(Debug, Clone, Serialize)]
pub struct StudentPageView {
    pub id: i64,
    pub student_name: String,
    pub student_id: i64,
    pub programm: String,
    pub degree_obtained: String,
    pub issuer_name: String,
    pub issuer_verify_url: String,
    pub issue_date: String,
    pub qr_code_link: Option<String>,
}

impl StudentPageView {
    pub fn from_record(record: StudentRecord, base_url: &str) -> Self {
        Self {
            issuer_verify_url: issuer_verify_url(base_url, record.issuer_uuid),
            issue_date: record.issue_date.format(PAGE_DATE_FORMAT).to_string(),
            id: record.id,
            student_name: record.student_name,
            student_id: record.student_id,
            programm: record.programm,
            degree_obtained: record.degree_obtained,
            issuer_name: record.issuer_name,
            qr_code_link: record.qr_code_link,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuerPageView {
    pub name_en: String,
    pub uuid: String,
    pub signature_url: Option<String>,
    pub students: Vec<StudentPageView>,
}

impl IssuerPageView {
    pub fn new(issuer: Issuer, students: Vec<StudentPageView>) -> Self {
        Self {
            name_en: issuer.name_en,
            uuid: issuer.uuid.to_string(),
            signature_url: issuer.signature_url,
            students,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::student_record;

    #[test]
    fn test_student_view_formats_date_and_issuer_link() {
        let view = StudentPageView::from_record(student_record(5), "http://localhost:3000");

        assert_eq!(view.issue_date, "May 01, 2024");
        assert_eq!(
            view.issuer_verify_url,
            "http://localhost:3000/certifications/verify-issuer/00000000-0000-0000-0000-000000000000/"
        );
    }
}
