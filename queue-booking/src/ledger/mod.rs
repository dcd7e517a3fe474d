//! Booking persistence.

use futures::future::BoxFuture;

use crate::{
    booking::{Booking, BookingRequest},
    errors::QueueError,
};

pub mod memory;
pub mod postgres;

/// Ticket numbers tried after the first candidate before giving up.
pub const MAX_PROBES: i64 = 32;

/// Stores bookings and hands out their ticket numbers.
pub trait BookingLedger: Send + Sync {
    /// Counts bookings for the request's (service, day), then inserts the
    /// request with ordinal `count + 1` as one atomic unit. When that number
    /// is already taken the next ordinal is tried, up to [`MAX_PROBES`] times.
    ///
    /// # Errors
    /// [`QueueError::Exhausted`] when every probe collided,
    /// [`QueueError::Persistence`] on storage failures.
    fn allocate<'a>(
        &'a self,
        req: &'a BookingRequest,
    ) -> BoxFuture<'a, Result<Booking, QueueError>>;
}
