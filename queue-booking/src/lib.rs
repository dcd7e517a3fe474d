//! Queue booking: ticket numbers unique per (service, day).
//!
//! A ticket looks like `Q{service:03}{MMDD}{ordinal:03}`, where the ordinal is
//! the number of existing bookings for the same service and day plus one.
//! [`QueueAllocator`] serializes allocation per (service, day) inside the
//! process; the ledger's unique constraint plus probing covers other
//! processes and gaps left by deleted bookings.

mod allocator;
mod booking;
mod errors;
mod ledger;
mod number;

pub use allocator::QueueAllocator;
pub use booking::{Booking, BookingReceipt, BookingRequest, BookingStatus};
pub use errors::QueueError;
pub use ledger::{
    BookingLedger, MAX_PROBES,
    memory::MemoryLedger,
    postgres::{PgLedger, init_schema},
};
pub use number::format_queue_number;
