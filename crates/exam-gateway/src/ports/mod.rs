//! Ports (hexagonal boundaries) for the registration gateway.

pub mod outbound;

pub use outbound::{Clock, RegistrationStore, SystemClock};
