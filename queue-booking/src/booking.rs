//! Booking records and request validation.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use directory::{ScopeInfo, ServiceId};
use serde::{Deserialize, Serialize};

use crate::errors::QueueError;

const MAX_NAME_CHARS: usize = 100;
const MAX_PHONE_CHARS: usize = 20;
const MAX_EMAIL_CHARS: usize = 100;

/// Lifecycle of a booking. New bookings start as `Pending`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown booking status '{other}'")),
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Incoming booking as sent by a citizen.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BookingRequest {
    pub citizen_name: String,
    pub citizen_phone: String,
    #[serde(default)]
    pub citizen_email: Option<String>,
    pub service_id: ServiceId,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Trims text fields, drops blank optionals and enforces column limits.
    pub(crate) fn normalized(&self) -> Result<Self, QueueError> {
        let name = required("citizen_name", &self.citizen_name, MAX_NAME_CHARS)?;
        let phone = required("citizen_phone", &self.citizen_phone, MAX_PHONE_CHARS)?;
        let email = optional(self.citizen_email.as_deref());
        if let Some(e) = &email {
            within("citizen_email", e, MAX_EMAIL_CHARS)?;
        }

        Ok(Self {
            citizen_name: name,
            citizen_phone: phone,
            citizen_email: email,
            service_id: self.service_id,
            booking_date: self.booking_date,
            booking_time: self.booking_time,
            notes: optional(self.notes.as_deref()),
        })
    }
}

fn required(field: &str, value: &str, max: usize) -> Result<String, QueueError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(QueueError::Validation(format!("{field} is required")));
    }
    within(field, v, max)?;
    Ok(v.to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn within(field: &str, value: &str, max: usize) -> Result<(), QueueError> {
    if value.chars().count() > max {
        return Err(QueueError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// A stored booking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Booking {
    pub id: i32,
    pub queue_number: String,
    pub citizen_name: String,
    pub citizen_phone: String,
    pub citizen_email: Option<String>,
    pub service_id: ServiceId,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A booking decorated with the names of its scope.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BookingReceipt {
    pub id: i32,
    pub queue_number: String,
    pub citizen_name: String,
    pub citizen_phone: String,
    pub citizen_email: Option<String>,
    pub province_name: String,
    pub district_name: String,
    pub service_name: String,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub province_id: i32,
    pub district_id: i32,
    pub service_id: ServiceId,
}

impl BookingReceipt {
    pub fn new(b: Booking, scope: ScopeInfo) -> Self {
        Self {
            id: b.id,
            queue_number: b.queue_number,
            citizen_name: b.citizen_name,
            citizen_phone: b.citizen_phone,
            citizen_email: b.citizen_email,
            province_name: scope.province_name,
            district_name: scope.district_name,
            service_name: scope.service_name,
            booking_date: b.booking_date,
            booking_time: b.booking_time,
            status: b.status,
            notes: b.notes,
            created_at: b.created_at,
            province_id: scope.province_id,
            district_id: scope.district_id,
            service_id: b.service_id,
        }
    }
}
