//! Mapping loose instruction fields onto a strict [`BookingRequest`].
//!
//! Values are normalised before typing: dates accept `YYYY-MM-DD`,
//! `today`/`tonight` and `tomorrow`; times accept `HH:MM`, `HH:MM:SS`, `7pm`
//! and `7:30 pm`; party sizes accept integers and numeric strings. A value
//! that cannot be normalised counts as missing.
//!
//! Fields are read from an ordered list of sources. Each field takes the
//! first value, across sources and aliases, that normalises; an unusable
//! value in an earlier source does not hide a usable one in a later source.

use std::sync::OnceLock;

use chrono::{Duration, NaiveDate, NaiveTime};
use regex::Regex;
use serde_json::{Map, Value};
use songbird_booking::{BookingRequest, ContactInfo, Intent, ReservationChange};

/// Accepted spellings for each canonical field.
const ALIASES: &[(&str, &[&str])] = &[
    ("date", &["date", "visit_date"]),
    ("time", &["time", "visit_time"]),
    ("party_size", &["party_size", "people", "guests"]),
    ("reservation_id", &["reservation_id", "booking_reference", "reference"]),
    ("name", &["name", "customer_name"]),
    ("phone", &["phone", "mobile"]),
    ("special_requests", &["special_requests", "requests", "notes"]),
];

/// Required fields that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields {
    /// Canonical field names, in declaration order.
    pub fields: Vec<String>,
}

impl std::fmt::Display for MissingFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing required fields: {}", self.fields.join(", "))
    }
}

fn aliases(canonical: &str) -> &'static [&'static str] {
    ALIASES
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, names)| *names)
        .unwrap_or(&[])
}

/// First value for `canonical` in `sources` that `normalise` accepts.
fn resolve<T>(
    sources: &[&Map<String, Value>],
    canonical: &str,
    normalise: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let names = aliases(canonical);
    sources
        .iter()
        .copied()
        .flat_map(|fields| names.iter().filter_map(move |name| fields.get(*name)))
        .find_map(normalise)
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Normalise a date relative to `today`.
pub fn parse_date(value: &Value, today: NaiveDate) -> Option<NaiveDate> {
    let raw = text(value)?.to_lowercase();
    match raw.as_str() {
        "today" | "tonight" | "this evening" => Some(today),
        "tomorrow" | "tomorrow night" => Some(today + Duration::days(1)),
        _ => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok(),
    }
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(\d{1,2})(?::(\d{2}))?(?::(\d{2}))?\s*(a\.?m\.?|p\.?m\.?)?$")
            .expect("time pattern is valid")
    })
}

/// Normalise a time of day.
pub fn parse_time(value: &Value) -> Option<NaiveTime> {
    let raw = text(value)?;
    let caps = time_pattern().captures(&raw)?;

    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let second: u32 = match caps.get(3) {
        Some(s) => s.as_str().parse().ok()?,
        None => 0,
    };

    match caps.get(4).map(|m| m.as_str().to_lowercase()) {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            let pm = meridiem.starts_with('p');
            hour = match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            };
        }
        // A bare hour is ambiguous without am/pm.
        None if caps.get(2).is_none() => return None,
        None => {}
    }

    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Normalise a party size (> 0).
pub fn parse_party_size(value: &Value) -> Option<u32> {
    let size = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(size).ok().filter(|n| *n > 0)
}

/// Build the request for `intent` from `sources`, highest priority first.
///
/// Only the fields declared for the intent are read; anything else in
/// the sources is ignored.
pub fn map_fields(
    intent: Intent,
    sources: &[&Map<String, Value>],
    today: NaiveDate,
) -> Result<BookingRequest, MissingFields> {
    let date = resolve(sources, "date", |v| parse_date(v, today));
    let time = resolve(sources, "time", parse_time);
    let party_size = resolve(sources, "party_size", parse_party_size);
    let reservation_id = resolve(sources, "reservation_id", text);

    let mut missing = Vec::new();
    let mut need = |name: &str, present: bool| {
        if !present {
            missing.push(name.to_string());
        }
    };

    let request = match intent {
        Intent::CheckAvailability => {
            need("date", date.is_some());
            need("party_size", party_size.is_some());
            match (date, party_size) {
                (Some(date), Some(party_size)) => {
                    Some(BookingRequest::CheckAvailability { date, party_size })
                }
                _ => None,
            }
        }
        Intent::CreateReservation => {
            let name = resolve(sources, "name", text);
            let phone = resolve(sources, "phone", text);
            need("date", date.is_some());
            need("time", time.is_some());
            need("party_size", party_size.is_some());
            need("name", name.is_some());
            need("phone", phone.is_some());
            match (date, time, party_size, name, phone) {
                (Some(date), Some(time), Some(party_size), Some(name), Some(phone)) => {
                    Some(BookingRequest::CreateReservation {
                        date,
                        time,
                        party_size,
                        contact: ContactInfo { name, phone },
                        special_requests: resolve(sources, "special_requests", text),
                    })
                }
                _ => None,
            }
        }
        Intent::ModifyReservation => {
            let change = ReservationChange {
                date,
                time,
                party_size,
            };
            need("reservation_id", reservation_id.is_some());
            need("date|time|party_size", !change.is_empty());
            match reservation_id {
                Some(reservation_id) if !change.is_empty() => {
                    Some(BookingRequest::ModifyReservation {
                        reservation_id,
                        change,
                    })
                }
                _ => None,
            }
        }
        Intent::CancelReservation => {
            need("reservation_id", reservation_id.is_some());
            reservation_id.map(|reservation_id| BookingRequest::CancelReservation { reservation_id })
        }
    };

    request.ok_or(MissingFields { fields: missing })
}
