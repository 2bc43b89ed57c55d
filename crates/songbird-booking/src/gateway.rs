//! Tool gateway: one operation per booking intent.
//!
//! The gateway validates each [`BookingRequest`], calls the configured
//! [`BookingApi`] and turns its raw body into a [`ToolResult`]. Failures are
//! returned to the caller synchronously; there is no retry here.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::api::BookingApi;
use crate::error::{GatewayError, Result};
use crate::intent::Intent;
use crate::request::BookingRequest;
use crate::result::ToolResult;

/// Uniform call/response interface to the booking tools.
#[derive(Clone)]
pub struct ToolGateway {
    api: Arc<dyn BookingApi>,
}

impl ToolGateway {
    /// Create a gateway over a booking backend.
    pub fn new(api: Arc<dyn BookingApi>) -> Self {
        Self { api }
    }

    /// Route a request to the operation for its intent.
    pub async fn dispatch(&self, request: &BookingRequest) -> Result<ToolResult> {
        match request.intent() {
            Intent::CheckAvailability => self.check_availability(request).await,
            Intent::CreateReservation => self.create_reservation(request).await,
            Intent::ModifyReservation => self.modify_reservation(request).await,
            Intent::CancelReservation => self.cancel_reservation(request).await,
        }
    }

    /// Look up free slots.
    pub async fn check_availability(&self, request: &BookingRequest) -> Result<ToolResult> {
        expect_intent(request, Intent::CheckAvailability)?;
        let BookingRequest::CheckAvailability { date, party_size } = request else {
            return Err(wrong_intent(request, Intent::CheckAvailability));
        };

        let body = self.api.availability_search(*date, *party_size).await?;
        let result = match response_object(&body)? {
            Reply::Rejected(detail) => ToolResult::failure(detail),
            Reply::Body(map) => ToolResult::availability(parse_slots(map)?),
        };
        log_result(Intent::CheckAvailability, &result);
        Ok(result)
    }

    /// Book a table.
    pub async fn create_reservation(&self, request: &BookingRequest) -> Result<ToolResult> {
        expect_intent(request, Intent::CreateReservation)?;
        let BookingRequest::CreateReservation {
            date,
            time,
            party_size,
            contact,
            special_requests,
        } = request
        else {
            return Err(wrong_intent(request, Intent::CreateReservation));
        };

        let body = self
            .api
            .create_booking(*date, *time, *party_size, contact, special_requests.as_deref())
            .await?;
        let result = match response_object(&body)? {
            Reply::Rejected(detail) => ToolResult::failure(detail),
            Reply::Body(map) => {
                let reference = map
                    .get("booking_reference")
                    .and_then(Value::as_str)
                    .ok_or_else(|| unexpected("booking response without booking_reference"))?;
                ToolResult::confirmation(reference, status_of(map, "confirmed"))
            }
        };
        log_result(Intent::CreateReservation, &result);
        Ok(result)
    }

    /// Change an existing booking.
    pub async fn modify_reservation(&self, request: &BookingRequest) -> Result<ToolResult> {
        expect_intent(request, Intent::ModifyReservation)?;
        let BookingRequest::ModifyReservation {
            reservation_id,
            change,
        } = request
        else {
            return Err(wrong_intent(request, Intent::ModifyReservation));
        };

        let body = self.api.update_booking(reservation_id, change).await?;
        let result = confirmation(&body, reservation_id, "updated")?;
        log_result(Intent::ModifyReservation, &result);
        Ok(result)
    }

    /// Cancel an existing booking.
    pub async fn cancel_reservation(&self, request: &BookingRequest) -> Result<ToolResult> {
        expect_intent(request, Intent::CancelReservation)?;
        let BookingRequest::CancelReservation { reservation_id } = request else {
            return Err(wrong_intent(request, Intent::CancelReservation));
        };

        let body = self.api.cancel_booking(reservation_id).await?;
        let result = confirmation(&body, reservation_id, "cancelled")?;
        log_result(Intent::CancelReservation, &result);
        Ok(result)
    }
}

enum Reply<'a> {
    Body(&'a Map<String, Value>),
    Rejected(String),
}

fn expect_intent(request: &BookingRequest, intent: Intent) -> Result<()> {
    if request.intent() != intent {
        return Err(wrong_intent(request, intent));
    }
    request.validate()?;
    debug!(intent = %intent, "Calling booking tool");
    Ok(())
}

fn wrong_intent(request: &BookingRequest, intent: Intent) -> GatewayError {
    GatewayError::ValidationError {
        intent,
        reason: format!("got a {} request", request.intent()),
    }
}

fn unexpected(what: &str) -> GatewayError {
    GatewayError::ToolUnavailable(format!("unexpected response shape: {what}"))
}

fn response_object(body: &Value) -> Result<Reply<'_>> {
    let map = body
        .as_object()
        .ok_or_else(|| unexpected("expected a JSON object"))?;
    let rejection = ["error", "detail"]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str));
    Ok(match rejection {
        Some(detail) => Reply::Rejected(detail.to_string()),
        None => Reply::Body(map),
    })
}

fn parse_slots(map: &Map<String, Value>) -> Result<Vec<String>> {
    let slots = map
        .get("available_slots")
        .and_then(Value::as_array)
        .ok_or_else(|| unexpected("availability response without available_slots"))?;

    let mut times = Vec::with_capacity(slots.len());
    for slot in slots {
        match slot {
            Value::String(time) => times.push(time.clone()),
            Value::Object(entry) => {
                let time = entry
                    .get("time")
                    .and_then(Value::as_str)
                    .ok_or_else(|| unexpected("slot without time"))?;
                if entry.get("available").and_then(Value::as_bool) != Some(false) {
                    times.push(time.to_string());
                }
            }
            _ => return Err(unexpected("slot is neither a string nor an object")),
        }
    }
    Ok(times)
}

fn status_of(map: &Map<String, Value>, default: &str) -> String {
    map.get("status")
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn confirmation(body: &Value, requested: &str, default_status: &str) -> Result<ToolResult> {
    Ok(match response_object(body)? {
        Reply::Rejected(detail) => ToolResult::failure(detail),
        Reply::Body(map) => {
            let reference = map
                .get("booking_reference")
                .and_then(Value::as_str)
                .unwrap_or(requested);
            ToolResult::confirmation(reference, status_of(map, default_status))
        }
    })
}

fn log_result(intent: Intent, result: &ToolResult) {
    if result.success {
        info!(intent = %intent, "Booking tool succeeded");
    } else {
        warn!(intent = %intent, payload = %result.to_value(), "Booking tool rejected request");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBookingApi;
    use crate::request::{ContactInfo, ReservationChange};
    use crate::result::ToolPayload;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    /// Backend that answers every call with a fixed body or error.
    struct FixedApi(std::result::Result<Value, GatewayError>);

    #[async_trait]
    impl BookingApi for FixedApi {
        async fn availability_search(&self, _: NaiveDate, _: u32) -> Result<Value> {
            self.0.clone()
        }
        async fn create_booking(
            &self,
            _: NaiveDate,
            _: NaiveTime,
            _: u32,
            _: &ContactInfo,
            _: Option<&str>,
        ) -> Result<Value> {
            self.0.clone()
        }
        async fn update_booking(&self, _: &str, _: &ReservationChange) -> Result<Value> {
            self.0.clone()
        }
        async fn cancel_booking(&self, _: &str) -> Result<Value> {
            self.0.clone()
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn availability(party_size: u32) -> BookingRequest {
        BookingRequest::CheckAvailability {
            date: date(),
            party_size,
        }
    }

    fn create(time: (u32, u32)) -> BookingRequest {
        BookingRequest::CreateReservation {
            date: date(),
            time: NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap(),
            party_size: 4,
            contact: ContactInfo {
                name: "Ada Lovelace".into(),
                phone: "07700900000".into(),
            },
            special_requests: None,
        }
    }

    fn gateway(api: impl BookingApi + 'static) -> ToolGateway {
        ToolGateway::new(Arc::new(api))
    }

    #[tokio::test]
    async fn test_check_availability_with_mock() {
        let gateway = gateway(MockBookingApi::new());
        let result = gateway.dispatch(&availability(4)).await.unwrap();
        assert!(result.success);
        match result.payload {
            ToolPayload::Availability { slots } => assert!(slots.contains(&"19:00:00".to_string())),
            other => panic!("expected availability, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_full_booking_lifecycle() {
        let gateway = gateway(MockBookingApi::new());

        let created = gateway.dispatch(&create((19, 0))).await.unwrap();
        assert_eq!(created, ToolResult::confirmation("SB0001", "confirmed"));

        let modify = BookingRequest::ModifyReservation {
            reservation_id: "SB0001".into(),
            change: ReservationChange {
                time: NaiveTime::from_hms_opt(20, 0, 0),
                ..Default::default()
            },
        };
        let modified = gateway.dispatch(&modify).await.unwrap();
        assert_eq!(modified, ToolResult::confirmation("SB0001", "updated"));

        let cancel = BookingRequest::CancelReservation {
            reservation_id: "SB0001".into(),
        };
        let cancelled = gateway.dispatch(&cancel).await.unwrap();
        assert_eq!(cancelled, ToolResult::confirmation("SB0001", "cancelled"));

        let again = gateway.dispatch(&cancel).await.unwrap();
        assert!(!again.success);
    }

    /// Backend that remembers the special requests of the last booking.
    #[derive(Default)]
    struct RequestsApi(std::sync::Mutex<Option<String>>);

    #[async_trait]
    impl BookingApi for RequestsApi {
        async fn availability_search(&self, _: NaiveDate, _: u32) -> Result<Value> {
            Ok(json!({"available_slots": []}))
        }
        async fn create_booking(
            &self,
            _: NaiveDate,
            _: NaiveTime,
            _: u32,
            _: &ContactInfo,
            special_requests: Option<&str>,
        ) -> Result<Value> {
            *self.0.lock().unwrap() = special_requests.map(str::to_string);
            Ok(json!({"booking_reference": "SB0009"}))
        }
        async fn update_booking(&self, _: &str, _: &ReservationChange) -> Result<Value> {
            Ok(json!({}))
        }
        async fn cancel_booking(&self, _: &str) -> Result<Value> {
            Ok(json!({}))
        }
    }

    #[tokio::test]
    async fn test_special_requests_reach_the_api() {
        let api = Arc::new(RequestsApi::default());
        let gateway = ToolGateway::new(api.clone());

        let mut request = create((19, 0));
        if let BookingRequest::CreateReservation {
            special_requests, ..
        } = &mut request
        {
            *special_requests = Some("birthday cake".into());
        }
        let result = gateway.dispatch(&request).await.unwrap();
        assert_eq!(result, ToolResult::confirmation("SB0009", "confirmed"));
        assert_eq!(api.0.lock().unwrap().as_deref(), Some("birthday cake"));
    }

    #[tokio::test]
    async fn test_business_rejection_is_unsuccessful_result() {
        let gateway = gateway(MockBookingApi::new());
        let off_menu = gateway.dispatch(&create((16, 30))).await.unwrap();
        assert!(!off_menu.success);
        assert!(matches!(off_menu.payload, ToolPayload::Error { .. }));
    }

    #[tokio::test]
    async fn test_validation_error_before_calling_api() {
        let gateway = gateway(FixedApi(Err(GatewayError::ToolUnavailable(
            "must not be called".into(),
        ))));
        let err = gateway.dispatch(&availability(0)).await.unwrap_err();
        assert!(matches!(err, GatewayError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn test_wrong_operation_for_intent() {
        let gateway = gateway(MockBookingApi::new());
        let err = gateway.cancel_reservation(&availability(2)).await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::ValidationError { intent: Intent::CancelReservation, .. }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_api_propagates() {
        let gateway = gateway(FixedApi(Err(GatewayError::ToolUnavailable(
            "connection refused".into(),
        ))));
        let err = gateway.dispatch(&availability(2)).await.unwrap_err();
        assert_eq!(err, GatewayError::ToolUnavailable("connection refused".into()));
    }

    #[tokio::test]
    async fn test_unexpected_shapes_are_unavailable() {
        for body in [
            json!([1, 2, 3]),
            json!({"slots": []}),
            json!({"available_slots": [42]}),
        ] {
            let gateway = gateway(FixedApi(Ok(body)));
            let err = gateway.dispatch(&availability(2)).await.unwrap_err();
            assert!(matches!(err, GatewayError::ToolUnavailable(_)));
        }

        let gateway = gateway(FixedApi(Ok(json!({"status": "ok"}))));
        let err = gateway.dispatch(&create((19, 0))).await.unwrap_err();
        assert!(matches!(err, GatewayError::ToolUnavailable(_)));
    }

    #[tokio::test]
    async fn test_string_slots_accepted() {
        let gateway = gateway(FixedApi(Ok(
            json!({"available_slots": ["18:00:00", {"time": "19:00:00", "available": false}]}),
        )));
        let result = gateway.dispatch(&availability(2)).await.unwrap();
        assert_eq!(result, ToolResult::availability(vec!["18:00:00".into()]));
    }
}
