//! # Node Configuration
//!
//! Environment overrides applied on top of [`GatewayConfig`] defaults.
//!
//! ## Environment Variables
//!
//! - `HOST`: bind address (default: 0.0.0.0)
//! - `PORT`: HTTP port (default: 3000)
//! - `STORAGE_URI`: `memory://` or `rocksdb://<path>` (required)
//! - `UPLOAD_DIR`: photo directory (default: uploads)
//! - `PUBLIC_DIR`: frontend build (default: public)
//! - `PUBLIC_BASE_URL`: origin for stored photo URLs
//!   (default: `http://localhost:<PORT>`)

use exam_gateway::domain::ConfigError;
use exam_gateway::GatewayConfig;
use std::path::PathBuf;
use tracing::warn;

/// Load configuration from the process environment.
pub fn load_config() -> Result<GatewayConfig, ConfigError> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration from an arbitrary variable lookup.
pub fn load_config_from<F>(lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let mut config = GatewayConfig::default();

    if let Some(host) = var("HOST") {
        match host.parse() {
            Ok(h) => config.http.host = h,
            Err(_) => warn!(value = %host, "HOST is not an IP address, keeping default"),
        }
    }
    if let Some(port) = var("PORT") {
        match port.parse() {
            Ok(p) => config.http.port = p,
            Err(_) => warn!(value = %port, "PORT is not a valid port, keeping default"),
        }
    }

    config.storage.uri = var("STORAGE_URI");

    if let Some(dir) = var("UPLOAD_DIR") {
        config.uploads.dir = PathBuf::from(dir);
    }
    if let Some(dir) = var("PUBLIC_DIR") {
        config.assets.public_dir = PathBuf::from(dir);
    }

    config.http.public_base_url = Some(
        var("PUBLIC_BASE_URL").unwrap_or_else(|| format!("http://localhost:{}", config.http.port)),
    );

    config.validate()?;
    Ok(config)
}
