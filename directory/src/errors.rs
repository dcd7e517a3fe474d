use thiserror::Error;

use crate::ServiceId;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No service row with this id.
    #[error("service {0} not found")]
    ServiceNotFound(ServiceId),

    /// Storage failure while reading the hierarchy.
    #[error("directory storage error: {0}")]
    Persistence(#[from] sqlx::Error),
}
