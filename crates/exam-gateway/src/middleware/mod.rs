//! Middleware stack for the registration gateway.
//!
//! Order (outermost first): CORS → Tracing. The body size limit is applied
//! on the API routes themselves.

pub mod cors;
pub mod tracing;

pub use cors::create_cors_layer;
pub use self::tracing::{TracingLayer, TracingService};

/// Response header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
