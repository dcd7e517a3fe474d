use chrono::NaiveDate;
use directory::ServiceId;

/// Formats a ticket: `Q`, service id (3 digits), month and day, ordinal (3 digits).
///
/// Wider values are not cut, so `ordinal = 1000` renders as `1000`.
pub fn format_queue_number(service_id: ServiceId, date: NaiveDate, ordinal: i64) -> String {
    format!("Q{service_id:03}{}{ordinal:03}", date.format("%m%d"))
}
