//! The fixed set of booking intents.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A booking operation the receptionist can delegate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Look up free slots for a date and party size.
    CheckAvailability,
    /// Book a table.
    CreateReservation,
    /// Change date, time or party size of a booking.
    ModifyReservation,
    /// Cancel a booking.
    CancelReservation,
}

impl Intent {
    /// Every intent, in declaration order.
    pub const ALL: [Intent; 4] = [
        Intent::CheckAvailability,
        Intent::CreateReservation,
        Intent::ModifyReservation,
        Intent::CancelReservation,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckAvailability => "check_availability",
            Self::CreateReservation => "create_reservation",
            Self::ModifyReservation => "modify_reservation",
            Self::CancelReservation => "cancel_reservation",
        }
    }

    /// Fields that must resolve for a request of this intent.
    ///
    /// A modification additionally needs at least one of
    /// [`Intent::optional_fields`].
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::CheckAvailability => &["date", "party_size"],
            Self::CreateReservation => &["date", "time", "party_size", "name", "phone"],
            Self::ModifyReservation => &["reservation_id"],
            Self::CancelReservation => &["reservation_id"],
        }
    }

    /// Fields that may be present but are not required.
    pub fn optional_fields(&self) -> &'static [&'static str] {
        match self {
            Self::CreateReservation => &["special_requests"],
            Self::ModifyReservation => &["date", "time", "party_size"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown intent name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIntent(pub String);

impl std::fmt::Display for UnknownIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown intent: {}", self.0)
    }
}

impl std::error::Error for UnknownIntent {}

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| UnknownIntent(s.to_string()))
    }
}
