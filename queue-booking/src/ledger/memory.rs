use std::sync::Mutex;

use chrono::Utc;
use futures::{FutureExt, future::BoxFuture};

use super::{BookingLedger, MAX_PROBES};
use crate::{
    booking::{Booking, BookingRequest, BookingStatus},
    errors::QueueError,
    number::format_queue_number,
};

/// Process-local ledger.
///
/// Counting and inserting take the lock separately and yield in between, the
/// way two round trips to a database would; uniqueness is still enforced on
/// insert.
#[derive(Default)]
pub struct MemoryLedger {
    rows: Mutex<Vec<Booking>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all bookings in insertion order.
    pub fn bookings(&self) -> Vec<Booking> {
        self.lock().clone()
    }

    /// Removes a booking, leaving a gap in its day's numbering.
    pub fn remove(&self, id: i32) -> bool {
        let mut rows = self.lock();
        let before = rows.len();
        rows.retain(|b| b.id != id);
        rows.len() != before
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Booking>> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn insert_next(&self, req: &BookingRequest) -> Result<Booking, QueueError> {
        let count = self
            .lock()
            .iter()
            .filter(|b| b.service_id == req.service_id && b.booking_date == req.booking_date)
            .count() as i64;

        tokio::task::yield_now().await;

        let mut rows = self.lock();
        for ordinal in count + 1..=count + 1 + MAX_PROBES {
            let number = format_queue_number(req.service_id, req.booking_date, ordinal);
            let taken = rows.iter().any(|b| {
                b.service_id == req.service_id
                    && b.booking_date == req.booking_date
                    && b.queue_number == number
            });
            if taken {
                continue;
            }

            let booking = Booking {
                id: rows.iter().map(|b| b.id).max().unwrap_or(0) + 1,
                queue_number: number,
                citizen_name: req.citizen_name.clone(),
                citizen_phone: req.citizen_phone.clone(),
                citizen_email: req.citizen_email.clone(),
                service_id: req.service_id,
                booking_date: req.booking_date,
                booking_time: req.booking_time,
                status: BookingStatus::Pending,
                notes: req.notes.clone(),
                created_at: Utc::now(),
            };
            rows.push(booking.clone());
            return Ok(booking);
        }

        Err(QueueError::Exhausted {
            service_id: req.service_id,
            date: req.booking_date,
        })
    }
}

impl BookingLedger for MemoryLedger {
    fn allocate<'a>(
        &'a self,
        req: &'a BookingRequest,
    ) -> BoxFuture<'a, Result<Booking, QueueError>> {
        self.insert_next(req).boxed()
    }
}
