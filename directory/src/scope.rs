use serde::{Deserialize, Serialize};

/// Primary key of a service row. Documents and bookings reference it.
pub type ServiceId = i32;

/// A service together with its district and province, ids and names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScopeInfo {
    pub service_id: ServiceId,
    pub district_id: i32,
    pub province_id: i32,
    pub service_name: String,
    pub district_name: String,
    pub province_name: String,
}
