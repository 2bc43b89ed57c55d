//! HTTP client for the restaurant booking service.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};
use reqwest::Url;
use tracing::{debug, trace};

use crate::api::{visit_date, visit_time, BookingApi, CANCELLATION_REASON_ID, CHANNEL_CODE};
use crate::error::{GatewayError, Result};
use crate::request::{ContactInfo, ReservationChange};

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Form-encoded client for the booking service.
#[derive(Clone)]
pub struct HttpBookingApi {
    client: reqwest::Client,
    base_url: Url,
    restaurant: String,
    bearer_token: Option<String>,
}

impl HttpBookingApi {
    /// Create a client for `restaurant` under `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        restaurant: impl Into<String>,
        bearer_token: Option<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::ToolUnavailable(format!("HTTP client setup failed: {e}")))?;

        let base_url = base_url.into();
        let base_url = Url::parse(&base_url)
            .map_err(|e| GatewayError::ToolUnavailable(format!("invalid booking URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::ToolUnavailable(format!(
                "booking URL {base_url} cannot carry a path"
            )));
        }

        Ok(Self {
            client,
            base_url,
            restaurant: restaurant.into(),
            bearer_token,
        })
    }

    /// URL of an endpoint below the restaurant.
    ///
    /// The restaurant name and every segment are percent-encoded, so a
    /// reference containing `/`, `?` or `#` stays inside its own segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                GatewayError::ToolUnavailable(format!(
                    "booking URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(&self.restaurant)
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let request = match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::ToolUnavailable(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::ToolUnavailable(format!("Failed to read response: {e}")))?;
        trace!(status = %status, body = %text, "Booking API response");

        if status.is_client_error() {
            // Rejections keep their message so the guest can be told why.
            let detail = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| rejection_detail(&body))
                .unwrap_or_else(|| format!("booking service rejected the request ({status})"));
            return Ok(json!({ "error": detail }));
        }
        if !status.is_success() {
            return Err(GatewayError::ToolUnavailable(format!(
                "booking service error {status}: {text}"
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| GatewayError::ToolUnavailable(format!("Invalid JSON from booking service: {e}")))
    }
}

/// Form fields for a new booking. Optional fields are left out when unset.
fn booking_form(
    date: NaiveDate,
    time: NaiveTime,
    party_size: u32,
    contact: &ContactInfo,
    special_requests: Option<&str>,
) -> Vec<(&'static str, String)> {
    let (first_name, surname) = contact.split_name();
    let mut form = vec![
        ("VisitDate", visit_date(date)),
        ("VisitTime", visit_time(time)),
        ("PartySize", party_size.to_string()),
        ("ChannelCode", CHANNEL_CODE.to_string()),
        ("Customer[FirstName]", first_name.to_string()),
        ("Customer[Mobile]", contact.phone.trim().to_string()),
    ];
    if !surname.is_empty() {
        form.push(("Customer[Surname]", surname.to_string()));
    }
    if let Some(requests) = special_requests.map(str::trim).filter(|r| !r.is_empty()) {
        form.push(("SpecialRequests", requests.to_string()));
    }
    form
}

/// Message carried by a rejection body, if any.
fn rejection_detail(body: &Value) -> Option<String> {
    ["detail", "error", "message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn availability_search(&self, date: NaiveDate, party_size: u32) -> Result<Value> {
        debug!(date = %date, party_size, "Searching availability");
        let form = [
            ("VisitDate", visit_date(date)),
            ("PartySize", party_size.to_string()),
            ("ChannelCode", CHANNEL_CODE.to_string()),
        ];
        let url = self.endpoint(&["AvailabilitySearch"])?;
        self.send(self.client.post(url).form(&form)).await
    }

    async fn create_booking(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        party_size: u32,
        contact: &ContactInfo,
        special_requests: Option<&str>,
    ) -> Result<Value> {
        debug!(date = %date, time = %time, party_size, "Creating booking");
        let form = booking_form(date, time, party_size, contact, special_requests);
        let url = self.endpoint(&["BookingWithStripeToken"])?;
        self.send(self.client.post(url).form(&form)).await
    }

    async fn update_booking(&self, reference: &str, change: &ReservationChange) -> Result<Value> {
        debug!(reference, "Updating booking");
        let mut form = Vec::new();
        if let Some(date) = change.date {
            form.push(("VisitDate", visit_date(date)));
        }
        if let Some(time) = change.time {
            form.push(("VisitTime", visit_time(time)));
        }
        if let Some(party_size) = change.party_size {
            form.push(("PartySize", party_size.to_string()));
        }
        let url = self.endpoint(&["Booking", reference])?;
        self.send(self.client.patch(url).form(&form)).await
    }

    async fn cancel_booking(&self, reference: &str) -> Result<Value> {
        debug!(reference, "Cancelling booking");
        let form = [
            ("micrositeName", self.restaurant.clone()),
            ("bookingReference", reference.to_string()),
            ("cancellationReasonId", CANCELLATION_REASON_ID.to_string()),
        ];
        let url = self.endpoint(&["Booking", reference, "Cancel"])?;
        self.send(self.client.post(url).form(&form)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str) -> HttpBookingApi {
        HttpBookingApi::new(base_url, "TheHungryUnicorn", None).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let expected =
            "http://localhost:8547/api/ConsumerApi/v1/Restaurant/TheHungryUnicorn/AvailabilitySearch";
        for base in [
            "http://localhost:8547/api/ConsumerApi/v1/Restaurant",
            "http://localhost:8547/api/ConsumerApi/v1/Restaurant/",
        ] {
            assert_eq!(api(base).endpoint(&["AvailabilitySearch"]).unwrap().as_str(), expected);
        }
    }

    #[test]
    fn test_reference_is_encoded_as_one_segment() {
        let api = api("http://localhost:8547/api/ConsumerApi/v1/Restaurant");
        let url = api.endpoint(&["Booking", "a/b?c#d", "Cancel"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8547/api/ConsumerApi/v1/Restaurant/TheHungryUnicorn/Booking/a%2Fb%3Fc%23d/Cancel"
        );
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());

        let url = api.endpoint(&["Booking", "../AvailabilitySearch"]).unwrap();
        assert!(url.path().ends_with("/Booking/..%2FAvailabilitySearch"));
    }

    #[test]
    fn test_invalid_base_url_is_unavailable() {
        for base in ["not a url", "mailto:desk@example.com"] {
            let err = HttpBookingApi::new(base, "TheHungryUnicorn", None).err().unwrap();
            assert!(matches!(err, GatewayError::ToolUnavailable(_)));
        }
    }

    #[test]
    fn test_booking_form_optional_fields() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let time = NaiveTime::from_hms_opt(19, 30, 0).unwrap();
        let contact = ContactInfo {
            name: "Ada Lovelace".into(),
            phone: " 07700900000 ".into(),
        };

        let form = booking_form(date, time, 2, &contact, Some("  nut allergy "));
        assert!(form.contains(&("VisitTime", "19:30:00".to_string())));
        assert!(form.contains(&("Customer[Surname]", "Lovelace".to_string())));
        assert!(form.contains(&("Customer[Mobile]", "07700900000".to_string())));
        assert!(form.contains(&("SpecialRequests", "nut allergy".to_string())));

        for requests in [None, Some("   ")] {
            let form = booking_form(date, time, 2, &contact, requests);
            assert!(form.iter().all(|(key, _)| *key != "SpecialRequests"));
        }
    }

    #[test]
    fn test_rejection_detail() {
        assert_eq!(
            rejection_detail(&json!({"detail": "Booking not found"})),
            Some("Booking not found".to_string())
        );
        assert_eq!(rejection_detail(&json!({"other": 1})), None);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        // Port 9 (discard) on localhost is not expected to run an HTTP server.
        let api = HttpBookingApi::new("http://127.0.0.1:9/api/", "Nowhere", None).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let err = api.availability_search(date, 2).await.unwrap_err();
        assert!(matches!(err, GatewayError::ToolUnavailable(_)));
    }
}
