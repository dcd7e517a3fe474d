use chrono::NaiveDate;
use directory::{DirectoryError, ServiceId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    /// The request failed validation (blank name, overlong phone, ...).
    #[error("invalid booking: {0}")]
    Validation(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Storage or transaction failure; the transaction was rolled back.
    #[error("storage error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Every probed ticket number was already taken.
    #[error("no free queue number for service {service_id} on {date}")]
    Exhausted { service_id: ServiceId, date: NaiveDate },
}
