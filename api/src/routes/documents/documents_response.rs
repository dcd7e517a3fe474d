use directory::ScopeInfo;
use rag_store::{DocumentId, IngestReceipt, ScopeFilter};
use serde::Serialize;

/// Reply to every successful ingestion.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub id: DocumentId,
    pub message: &'static str,
    #[serde(flatten)]
    pub scope: ScopeInfo,
}

impl IngestResponse {
    pub fn new(receipt: IngestReceipt, message: &'static str) -> Self {
        Self {
            id: receipt.document_id,
            message,
            scope: receipt.scope,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentCountResponse {
    pub total_documents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<i32>,
}

impl DocumentCountResponse {
    pub fn new(total_documents: i64, f: ScopeFilter) -> Self {
        Self {
            total_documents,
            province_id: f.province_id,
            district_id: f.district_id,
            service_id: f.service_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: DocumentId,
    pub message: &'static str,
}
