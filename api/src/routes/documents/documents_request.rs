use directory::ServiceId;
use rag_store::ScopeFilter;
use serde::Deserialize;

/// Body of POST /add/text.
#[derive(Debug, Deserialize)]
pub struct AddTextRequest {
    pub text: String,
    pub service_id: ServiceId,
}

/// Scope filter shared by listing and counting.
#[derive(Debug, Default, Deserialize)]
pub struct ScopeParams {
    pub province_id: Option<i32>,
    pub district_id: Option<i32>,
    pub service_id: Option<i32>,
}

impl From<&ScopeParams> for ScopeFilter {
    fn from(p: &ScopeParams) -> Self {
        ScopeFilter {
            province_id: p.province_id,
            district_id: p.district_id,
            service_id: p.service_id,
        }
    }
}

/// Query string of GET /documents.
#[derive(Debug, Deserialize)]
pub struct ListDocumentsParams {
    pub province_id: Option<i32>,
    pub district_id: Option<i32>,
    pub service_id: Option<i32>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    10
}

impl ListDocumentsParams {
    pub fn filter(&self) -> ScopeFilter {
        ScopeFilter {
            province_id: self.province_id,
            district_id: self.district_id,
            service_id: self.service_id,
        }
    }
}
