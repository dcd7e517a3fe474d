//! Read-only view over the administrative hierarchy (province → district → service).
//!
//! The hierarchy itself is managed elsewhere; this crate only answers
//! "which province and district does service `N` belong to, and what are
//! their names". Ingestion uses it for validation and response decoration,
//! queue booking for the same.

mod errors;
mod memory;
mod postgres;
mod scope;

pub use errors::DirectoryError;
pub use memory::StaticDirectory;
pub use postgres::{PgDirectory, init_schema};
pub use scope::{ScopeInfo, ServiceId};

use futures::future::BoxFuture;

/// Resolves a service id into its full scope.
///
/// Implementations must be cheap to share (`Arc<dyn ServiceDirectory>`).
pub trait ServiceDirectory: Send + Sync {
    /// Returns the scope of `service_id`.
    ///
    /// # Errors
    /// [`DirectoryError::ServiceNotFound`] for unknown ids,
    /// [`DirectoryError::Persistence`] on storage failures.
    fn resolve_service(
        &self,
        service_id: ServiceId,
    ) -> BoxFuture<'_, Result<ScopeInfo, DirectoryError>>;
}
