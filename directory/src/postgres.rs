//! Postgres-backed directory and the hierarchy schema.

use futures::FutureExt;
use futures::future::BoxFuture;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::{DirectoryError, ScopeInfo, ServiceDirectory, ServiceId};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS provinces (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100) UNIQUE NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS districts (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        province_id INTEGER REFERENCES provinces(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS services (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        district_id INTEGER REFERENCES districts(id) ON DELETE CASCADE
    )",
    "CREATE INDEX IF NOT EXISTS idx_district_province ON districts(province_id)",
    "CREATE INDEX IF NOT EXISTS idx_service_district ON services(district_id)",
];

/// Creates the hierarchy tables if they do not exist yet.
///
/// Must run before the document and booking schemas, which reference `services`.
pub async fn init_schema(pool: &PgPool) -> Result<(), DirectoryError> {
    let mut tx = pool.begin().await?;
    for stmt in SCHEMA {
        sqlx::query(stmt).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    info!("directory schema ready");
    Ok(())
}

/// Directory reading the `provinces`/`districts`/`services` tables.
#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, service_id: ServiceId) -> Result<ScopeInfo, DirectoryError> {
        debug!(service_id, "resolving service scope");
        sqlx::query_as::<_, ScopeInfo>(
            "SELECT s.id AS service_id, d.id AS district_id, p.id AS province_id,
                    s.name AS service_name, d.name AS district_name, p.name AS province_name
             FROM services s
             JOIN districts d ON s.district_id = d.id
             JOIN provinces p ON d.province_id = p.id
             WHERE s.id = $1",
        )
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DirectoryError::ServiceNotFound(service_id))
    }
}

impl ServiceDirectory for PgDirectory {
    fn resolve_service(
        &self,
        service_id: ServiceId,
    ) -> BoxFuture<'_, Result<ScopeInfo, DirectoryError>> {
        self.fetch(service_id).boxed()
    }
}
