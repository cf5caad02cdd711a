use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Which students a batch run covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QrScope {
    /// Only students without a stored QR link
    #[default]
    Missing,
    /// Every student; existing images are overwritten
    All,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct QrBatchQuery {
    /// `missing` (default) or `all`
    #[serde(default)]
    #[param(value_type = Option<QrScope>)]
    pub scope: QrScope,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QrBatchReportDto {
    pub scope: QrScope,
    pub generated: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentQrDto {
    /// Student record ID
    pub id: i64,
    /// Page encoded in the QR code
    pub verification_url: String,
    /// Public URL of the stored PNG
    pub qr_code_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_query_defaults_to_missing() {
        let query: QrBatchQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(query.scope, QrScope::Missing);

        let query: QrBatchQuery =
            serde_json::from_value(serde_json::json!({ "scope": "all" })).unwrap();
        assert_eq!(query.scope, QrScope::All);
    }
}
