use std::collections::HashMap;

use futures::future::{self, BoxFuture};

use crate::{DirectoryError, ScopeInfo, ServiceDirectory, ServiceId};

/// Fixed, in-process directory. Handy for embedding the pipeline without a
/// database and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    services: HashMap<ServiceId, ScopeInfo>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a service.
    pub fn with_service(mut self, scope: ScopeInfo) -> Self {
        self.services.insert(scope.service_id, scope);
        self
    }
}

impl ServiceDirectory for StaticDirectory {
    fn resolve_service(
        &self,
        service_id: ServiceId,
    ) -> BoxFuture<'_, Result<ScopeInfo, DirectoryError>> {
        let res = self
            .services
            .get(&service_id)
            .cloned()
            .ok_or(DirectoryError::ServiceNotFound(service_id));
        Box::pin(future::ready(res))
    }
}
