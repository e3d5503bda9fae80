//! # Exam Node
//!
//! Process wiring for the exam registration backend.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`EXAM_LOG_LEVEL` / `RUST_LOG`, `EXAM_JSON_LOGS`)
//! 2. Load and validate configuration from the environment
//! 3. Create the upload directory
//! 4. Open and ping the registration store (failure is fatal)
//! 5. Serve until Ctrl+C
//!
//! ## Modules
//!
//! - `config` - environment overrides on top of `GatewayConfig` defaults
//! - `storage` - storage URI to store adapter
//! - `telemetry` - tracing subscriber setup

pub mod config;
pub mod storage;
pub mod telemetry;

pub use config::{load_config, load_config_from};
pub use storage::open_store;
pub use telemetry::{init_logging, TelemetryConfig, TelemetryError};
