//! Domain types for the registration gateway.
//!
//! Pure logic only: checksum, field rules, subject normalization, records,
//! configuration, and errors. No I/O lives here.

pub mod checksum;
pub mod config;
pub mod error;
pub mod messages;
pub mod subjects;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use checksum::{check_digit, is_valid_identity_number, IDENTITY_NUMBER_LEN};
pub use config::{
    AssetsConfig, ConfigError, CorsConfig, GatewayConfig, HttpConfig, LimitsConfig,
    StorageBackend, StorageConfig, UploadConfig,
};
pub use error::{
    FieldError, FieldLocation, GatewayError, RegistrationError, StoreError, UploadError,
};
pub use subjects::{normalize_subjects, SubjectsInput, SUBJECTS};
pub use types::{Registration, RegistrationId};
pub use validation::{validate_form, RegistrationForm, ValidatedForm};
