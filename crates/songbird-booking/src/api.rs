//! Booking API backend trait.
//!
//! Backends return the raw JSON body of the booking service. Interpreting
//! that body (and rejecting unexpected shapes) is the gateway's job, so every
//! backend is held to the same response contract.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

use crate::error::Result;
use crate::request::{ContactInfo, ReservationChange};

/// Channel code sent with availability searches and bookings.
pub const CHANNEL_CODE: &str = "ONLINE";

/// Cancellation reason sent with cancellations ("customer request").
pub const CANCELLATION_REASON_ID: u32 = 1;

/// Raw access to the restaurant booking service.
///
/// Business rejections (unknown reference, no table) come back as a body
/// carrying an `error` or `detail` string. Transport failures are
/// `ToolUnavailable`.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Search free slots. Body carries `available_slots`.
    async fn availability_search(&self, date: NaiveDate, party_size: u32) -> Result<Value>;

    /// Create a booking. Body carries `booking_reference`.
    async fn create_booking(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        party_size: u32,
        contact: &ContactInfo,
        special_requests: Option<&str>,
    ) -> Result<Value>;

    /// Update a booking.
    async fn update_booking(&self, reference: &str, change: &ReservationChange) -> Result<Value>;

    /// Cancel a booking.
    async fn cancel_booking(&self, reference: &str) -> Result<Value>;
}

/// Format a visit time the way the booking service expects (`HH:MM:SS`).
pub fn visit_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Format a visit date the way the booking service expects (`YYYY-MM-DD`).
pub fn visit_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
