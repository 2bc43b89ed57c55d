//! In-process booking service for tests and offline runs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::debug;

use crate::api::{visit_date, visit_time, BookingApi};
use crate::error::Result;
use crate::request::{ContactInfo, ReservationChange};

/// Seating times offered every day.
pub const MOCK_SLOTS: [&str; 6] = [
    "12:00:00", "13:00:00", "18:00:00", "19:00:00", "20:00:00", "21:00:00",
];

/// Largest party the mock restaurant seats.
pub const MAX_PARTY_SIZE: u32 = 8;

#[derive(Debug, Clone)]
struct MockBooking {
    date: NaiveDate,
    time: NaiveTime,
    party_size: u32,
    cancelled: bool,
}

/// Deterministic booking service: fixed slots, sequential references.
#[derive(Debug, Default)]
pub struct MockBookingApi {
    bookings: Mutex<HashMap<String, MockBooking>>,
}

impl MockBookingApi {
    /// Create an empty mock service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bookings made, cancelled ones included.
    pub async fn booking_count(&self) -> usize {
        self.bookings.lock().await.len()
    }

    fn taken(
        bookings: &HashMap<String, MockBooking>,
        date: NaiveDate,
        exclude: Option<&str>,
    ) -> Vec<String> {
        bookings
            .iter()
            .filter(|(reference, b)| {
                !b.cancelled && b.date == date && Some(reference.as_str()) != exclude
            })
            .map(|(_, b)| visit_time(b.time))
            .collect()
    }

    fn slot_free(
        bookings: &HashMap<String, MockBooking>,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<&str>,
    ) -> bool {
        let time = visit_time(time);
        MOCK_SLOTS.contains(&time.as_str()) && !Self::taken(bookings, date, exclude).contains(&time)
    }
}

#[async_trait]
impl BookingApi for MockBookingApi {
    async fn availability_search(&self, date: NaiveDate, party_size: u32) -> Result<Value> {
        let bookings = self.bookings.lock().await;
        let taken = Self::taken(&bookings, date, None);
        let slots: Vec<Value> = MOCK_SLOTS
            .iter()
            .filter(|_| party_size <= MAX_PARTY_SIZE)
            .map(|time| json!({"time": time, "available": !taken.iter().any(|t| t.as_str() == *time)}))
            .collect();
        Ok(json!({
            "visit_date": visit_date(date),
            "party_size": party_size,
            "available_slots": slots,
        }))
    }

    async fn create_booking(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        party_size: u32,
        _contact: &ContactInfo,
        _special_requests: Option<&str>,
    ) -> Result<Value> {
        let mut bookings = self.bookings.lock().await;
        if party_size > MAX_PARTY_SIZE {
            return Ok(json!({"error": format!("parties larger than {MAX_PARTY_SIZE} cannot be booked online")}));
        }
        if !Self::slot_free(&bookings, date, time, None) {
            return Ok(json!({"error": format!("{} on {} is not available", visit_time(time), visit_date(date))}));
        }

        let reference = format!("SB{:04}", bookings.len() + 1);
        bookings.insert(
            reference.clone(),
            MockBooking {
                date,
                time,
                party_size,
                cancelled: false,
            },
        );
        debug!(reference = %reference, "Mock booking created");
        Ok(json!({"booking_reference": reference, "status": "confirmed"}))
    }

    async fn update_booking(&self, reference: &str, change: &ReservationChange) -> Result<Value> {
        let mut bookings = self.bookings.lock().await;
        let Some(existing) = bookings.get(reference).filter(|b| !b.cancelled).cloned() else {
            return Ok(json!({"error": format!("booking {reference} not found")}));
        };

        let updated = MockBooking {
            date: change.date.unwrap_or(existing.date),
            time: change.time.unwrap_or(existing.time),
            party_size: change.party_size.unwrap_or(existing.party_size),
            cancelled: false,
        };
        if updated.party_size > MAX_PARTY_SIZE {
            return Ok(json!({"error": format!("parties larger than {MAX_PARTY_SIZE} cannot be booked online")}));
        }
        if !Self::slot_free(&bookings, updated.date, updated.time, Some(reference)) {
            return Ok(json!({"error": "the requested time is not available"}));
        }

        bookings.insert(reference.to_string(), updated);
        Ok(json!({"booking_reference": reference, "status": "updated"}))
    }

    async fn cancel_booking(&self, reference: &str) -> Result<Value> {
        let mut bookings = self.bookings.lock().await;
        match bookings.get_mut(reference) {
            Some(booking) if !booking.cancelled => {
                booking.cancelled = true;
                Ok(json!({"booking_reference": reference, "status": "cancelled"}))
            }
            _ => Ok(json!({"error": format!("booking {reference} not found")})),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn seven() -> NaiveTime {
        NaiveTime::from_hms_opt(19, 0, 0).unwrap()
    }

    fn contact() -> ContactInfo {
        ContactInfo {
            name: "Ada Lovelace".into(),
            phone: "07700900000".into(),
        }
    }

    #[tokio::test]
    async fn test_booking_takes_slot() {
        let api = MockBookingApi::new();
        let body = api.create_booking(date(), seven(), 4, &contact(), None).await.unwrap();
        assert_eq!(body["booking_reference"], "SB0001");

        let search = api.availability_search(date(), 4).await.unwrap();
        let seven_slot = search["available_slots"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["time"] == "19:00:00")
            .unwrap();
        assert_eq!(seven_slot["available"], false);

        let again = api.create_booking(date(), seven(), 2, &contact(), None).await.unwrap();
        assert!(again["error"].is_string());
    }

    #[tokio::test]
    async fn test_cancel_then_modify_fails() {
        let api = MockBookingApi::new();
        api.create_booking(date(), seven(), 2, &contact(), None).await.unwrap();

        let cancelled = api.cancel_booking("SB0001").await.unwrap();
        assert_eq!(cancelled["status"], "cancelled");

        let change = ReservationChange {
            party_size: Some(3),
            ..Default::default()
        };
        let modified = api.update_booking("SB0001", &change).await.unwrap();
        assert!(modified["error"].is_string());

        let twice = api.cancel_booking("SB0001").await.unwrap();
        assert!(twice["error"].is_string());
    }

    #[tokio::test]
    async fn test_large_party_has_no_slots() {
        let api = MockBookingApi::new();
        let search = api.availability_search(date(), 12).await.unwrap();
        assert!(search["available_slots"].as_array().unwrap().is_empty());
    }
}
