//! HTTP handlers for the `/api` routes.

pub mod meta;
pub mod register;

use crate::registration::RegistrationService;
use std::sync::Arc;

/// Shared state for the API router
#[derive(Clone)]
pub struct AppState {
    pub registrations: Arc<RegistrationService>,
}
