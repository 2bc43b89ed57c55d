//! Strictly typed booking requests.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};
use crate::intent::Intent;

/// Guest contact details for a new booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Full name as given by the guest.
    pub name: String,
    /// Mobile number.
    pub phone: String,
}

impl ContactInfo {
    /// First name and surname, split on the first space.
    pub fn split_name(&self) -> (&str, &str) {
        let name = self.name.trim();
        match name.split_once(' ') {
            Some((first, rest)) => (first, rest.trim()),
            None => (name, ""),
        }
    }
}

/// Fields to change on an existing booking. At least one must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationChange {
    /// New visit date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// New visit time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    /// New party size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_size: Option<u32>,
}

impl ReservationChange {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.time.is_none() && self.party_size.is_none()
    }
}

/// A booking request with every field its intent needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum BookingRequest {
    /// Look up free slots.
    CheckAvailability {
        /// Visit date.
        date: NaiveDate,
        /// Number of guests.
        party_size: u32,
    },
    /// Book a table.
    CreateReservation {
        /// Visit date.
        date: NaiveDate,
        /// Visit time.
        time: NaiveTime,
        /// Number of guests.
        party_size: u32,
        /// Guest contact details.
        contact: ContactInfo,
        /// Free-text requests passed on to the restaurant (allergies, high chair).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        special_requests: Option<String>,
    },
    /// Change an existing booking.
    ModifyReservation {
        /// Booking reference.
        reservation_id: String,
        /// Fields to change.
        change: ReservationChange,
    },
    /// Cancel an existing booking.
    CancelReservation {
        /// Booking reference.
        reservation_id: String,
    },
}

impl BookingRequest {
    /// Intent this request serves.
    pub fn intent(&self) -> Intent {
        match self {
            Self::CheckAvailability { .. } => Intent::CheckAvailability,
            Self::CreateReservation { .. } => Intent::CreateReservation,
            Self::ModifyReservation { .. } => Intent::ModifyReservation,
            Self::CancelReservation { .. } => Intent::CancelReservation,
        }
    }

    /// Check that every field carries a usable value.
    pub fn validate(&self) -> Result<()> {
        let intent = self.intent();
        let invalid = |reason: &str| -> Result<()> {
            Err(GatewayError::ValidationError {
                intent,
                reason: reason.to_string(),
            })
        };

        match self {
            Self::CheckAvailability { party_size, .. } if *party_size == 0 => {
                invalid("party_size must be positive")
            }
            Self::CreateReservation {
                party_size,
                contact,
                ..
            } => {
                if *party_size == 0 {
                    invalid("party_size must be positive")
                } else if contact.name.trim().is_empty() {
                    invalid("name is required")
                } else if contact.phone.trim().is_empty() {
                    invalid("phone is required")
                } else {
                    Ok(())
                }
            }
            Self::ModifyReservation {
                reservation_id,
                change,
            } => {
                if reservation_id.trim().is_empty() {
                    invalid("reservation_id is required")
                } else if change.is_empty() {
                    invalid("at least one of date, time or party_size must change")
                } else if change.party_size == Some(0) {
                    invalid("party_size must be positive")
                } else {
                    Ok(())
                }
            }
            Self::CancelReservation { reservation_id } if reservation_id.trim().is_empty() => {
                invalid("reservation_id is required")
            }
            _ => Ok(()),
        }
    }

    /// JSON form for turn records.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
