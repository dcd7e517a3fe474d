//! Booking entry point with per-(service, day) serialization.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex},
};

use chrono::NaiveDate;
use directory::{ServiceDirectory, ServiceId};
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::{
    booking::{BookingReceipt, BookingRequest},
    errors::QueueError,
    ledger::BookingLedger,
};

type DayKey = (ServiceId, NaiveDate);

/// Validates, resolves the service, then allocates under the day's lock.
///
/// Different (service, day) keys proceed in parallel. Lock entries are
/// dropped once no task holds or waits for them.
pub struct QueueAllocator {
    ledger: Arc<dyn BookingLedger>,
    directory: Arc<dyn ServiceDirectory>,
    locks: StdMutex<HashMap<DayKey, Arc<Mutex<()>>>>,
}

impl QueueAllocator {
    pub fn new(ledger: Arc<dyn BookingLedger>, directory: Arc<dyn ServiceDirectory>) -> Self {
        Self {
            ledger,
            directory,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Books a ticket.
    ///
    /// # Errors
    /// - [`QueueError::Validation`] for blank or overlong fields
    /// - [`QueueError::Directory`] for unknown services
    /// - [`QueueError::Exhausted`] / [`QueueError::Persistence`] from the ledger
    #[instrument(skip_all, fields(service_id = req.service_id, date = %req.booking_date))]
    pub async fn book(&self, req: &BookingRequest) -> Result<BookingReceipt, QueueError> {
        let req = req.normalized()?;
        let scope = self.directory.resolve_service(req.service_id).await?;

        let lease = self.lease((req.service_id, req.booking_date));
        let booking = {
            let _guard = lease.lock.lock().await;
            self.ledger.allocate(&req).await?
        };
        drop(lease);

        info!(queue_number = %booking.queue_number, booking_id = booking.id, "queue booked");
        Ok(BookingReceipt::new(booking, scope))
    }

    fn lease(&self, key: DayKey) -> DayLease<'_> {
        let mut map = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        let lock = map.entry(key).or_default().clone();
        DayLease {
            locks: &self.locks,
            key,
            lock,
        }
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.locks.lock().unwrap().len()
    }
}

/// Shared handle on one day's lock; the last one out prunes the map entry,
/// including when the booking future is dropped mid-wait.
struct DayLease<'a> {
    locks: &'a StdMutex<HashMap<DayKey, Arc<Mutex<()>>>>,
    key: DayKey,
    lock: Arc<Mutex<()>>,
}

impl Drop for DayLease<'_> {
    fn drop(&mut self) {
        let mut map = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // One reference in the map, one here: nobody else is waiting.
        if Arc::strong_count(&self.lock) == 2 {
            map.remove(&self.key);
        }
    }
}
