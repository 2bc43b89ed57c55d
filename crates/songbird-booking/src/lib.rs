//! Songbird Booking - typed booking requests and the tool gateway.
//!
//! - [`Intent`]: the fixed set of booking operations
//! - [`BookingRequest`]: strictly typed fields per intent
//! - [`ToolResult`]: success flag plus availability, confirmation or error
//! - [`BookingApi`]: backend trait, with [`HttpBookingApi`] and [`MockBookingApi`]
//! - [`ToolGateway`]: validates requests and interprets backend responses

pub mod api;
pub mod error;
pub mod gateway;
pub mod http;
pub mod intent;
pub mod mock;
pub mod request;
pub mod result;

pub use api::BookingApi;
pub use error::{GatewayError, Result};
pub use gateway::ToolGateway;
pub use http::HttpBookingApi;
pub use intent::{Intent, UnknownIntent};
pub use mock::MockBookingApi;
pub use request::{BookingRequest, ContactInfo, ReservationChange};
pub use result::{ToolPayload, ToolResult};
