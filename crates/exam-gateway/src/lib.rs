// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! Exam Gateway - HTTP surface for exam registration.
//!
//! Accepts applicant registrations as multipart forms, validates them
//! (including the 13-digit identity number checksum), stores the applicant
//! photo, and persists one record per identity number.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        EXAM GATEWAY                              │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   /api/subjects   /api/register   /api/health   /uploads   /*    │
//! │         │               │              │            │       │    │
//! │  ┌──────┴───────────────┴──────────────┴────────────┴───────┴─┐  │
//! │  │               Middleware Stack: CORS → Tracing             │  │
//! │  └───────────────────────────┬────────────────────────────────┘  │
//! │                              │                                   │
//! │  ┌───────────────────────────┴────────────────────────────────┐  │
//! │  │  RegistrationService: validate → store photo → insert      │  │
//! │  └──────────────┬─────────────────────────────┬───────────────┘  │
//! │                 │                             │                  │
//! │        ┌────────┴────────┐          ┌─────────┴─────────┐        │
//! │        │   PhotoStore    │          │ RegistrationStore │        │
//! │        │ (upload dir)    │          │ memory | rocksdb  │        │
//! │        └─────────────────┘          └───────────────────┘        │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use exam_gateway::{ExamGatewayService, GatewayConfig, InMemoryRegistrationStore};
//!
//! let mut config = GatewayConfig::default();
//! config.storage.uri = Some("memory://".into());
//! let service = ExamGatewayService::new(config, Arc::new(InMemoryRegistrationStore::new()))?;
//! service.run(shutdown_signal()).await?;
//! ```
//!
//! # Guarantees
//!
//! - A rejected submission leaves no record and no file behind
//! - At most one record per identity number, enforced by the store
//! - Concurrent uploads never overwrite each other's files

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod registration;
pub mod service;

// Re-exports
pub use adapters::{InMemoryRegistrationStore, PhotoStore, StoredPhoto};
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbRegistrationStore};
pub use domain::{
    is_valid_identity_number, normalize_subjects, ConfigError, FieldError, GatewayConfig,
    GatewayError, Registration, RegistrationError, RegistrationId, StorageBackend, StoreError,
    SubjectsInput, UploadError, SUBJECTS,
};
pub use ports::{Clock, RegistrationStore, SystemClock};
pub use registration::{RegistrationService, Submission};
pub use service::ExamGatewayService;
