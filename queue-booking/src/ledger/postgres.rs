//! Postgres ledger: one transaction per booking, guarded by
//! `UNIQUE (service_id, booking_date, queue_number)`.

use futures::{FutureExt, future::BoxFuture};
use sqlx::PgPool;
use tracing::{debug, info};

use super::{BookingLedger, MAX_PROBES};
use crate::{
    booking::{Booking, BookingRequest, BookingStatus},
    errors::QueueError,
    number::format_queue_number,
};

/// Creates `queue_bookings` and its indexes. Requires the `services` table.
pub async fn init_schema(pool: &PgPool) -> Result<(), QueueError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS queue_bookings (
            id SERIAL PRIMARY KEY,
            queue_number VARCHAR(20) NOT NULL,
            citizen_name VARCHAR(100) NOT NULL,
            citizen_phone VARCHAR(20) NOT NULL,
            citizen_email VARCHAR(100),
            service_id INTEGER NOT NULL REFERENCES services(id) ON DELETE CASCADE,
            booking_date DATE NOT NULL,
            booking_time TIME NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'pending',
            notes TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            UNIQUE (service_id, booking_date, queue_number)
        )",
    )
    .execute(&mut *tx)
    .await?;

    for stmt in [
        "CREATE INDEX IF NOT EXISTS idx_queue_date ON queue_bookings(booking_date)",
        "CREATE INDEX IF NOT EXISTS idx_queue_status ON queue_bookings(status)",
    ] {
        sqlx::query(stmt).execute(&mut *tx).await?;
    }

    tx.commit().await?;
    info!("queue_bookings schema ready");
    Ok(())
}

const INSERT_BOOKING: &str = "INSERT INTO queue_bookings (
        queue_number, citizen_name, citizen_phone, citizen_email,
        service_id, booking_date, booking_time, status, notes
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    ON CONFLICT (service_id, booking_date, queue_number) DO NOTHING
    RETURNING id, queue_number, citizen_name, citizen_phone, citizen_email,
              service_id, booking_date, booking_time, status, notes, created_at";

#[derive(Clone)]
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_next(&self, req: &BookingRequest) -> Result<Booking, QueueError> {
        let mut tx = self.pool.begin().await?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM queue_bookings WHERE service_id = $1 AND booking_date = $2",
        )
        .bind(req.service_id)
        .bind(req.booking_date)
        .fetch_one(&mut *tx)
        .await?;

        for ordinal in count + 1..=count + 1 + MAX_PROBES {
            let number = format_queue_number(req.service_id, req.booking_date, ordinal);
            let row: Option<Booking> = sqlx::query_as(INSERT_BOOKING)
                .bind(&number)
                .bind(&req.citizen_name)
                .bind(&req.citizen_phone)
                .bind(req.citizen_email.as_deref())
                .bind(req.service_id)
                .bind(req.booking_date)
                .bind(req.booking_time)
                .bind(BookingStatus::Pending.as_str())
                .bind(req.notes.as_deref())
                .fetch_optional(&mut *tx)
                .await?;

            match row {
                Some(booking) => {
                    tx.commit().await?;
                    return Ok(booking);
                }
                None => debug!(queue_number = %number, "queue number taken, probing next"),
            }
        }

        Err(QueueError::Exhausted {
            service_id: req.service_id,
            date: req.booking_date,
        })
    }
}

impl BookingLedger for PgLedger {
    fn allocate<'a>(
        &'a self,
        req: &'a BookingRequest,
    ) -> BoxFuture<'a, Result<Booking, QueueError>> {
        self.insert_next(req).boxed()
    }
}
