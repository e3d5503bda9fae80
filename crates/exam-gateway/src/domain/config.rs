//! Gateway configuration with validation.
//!
//! The configuration is built once at startup, validated, and handed to
//! [`crate::ExamGatewayService`]; nothing reads the environment after that.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// 5 MiB
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Registration storage backend
    pub storage: StorageConfig,
    /// Photo upload constraints and destination
    pub uploads: UploadConfig,
    /// Static frontend assets
    pub assets: AssetsConfig,
    /// Request body limits
    pub limits: LimitsConfig,
    /// CORS configuration
    pub cors: CorsConfig,
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.backend()?;

        if self.uploads.field_name.is_empty() {
            return Err(ConfigError::Invalid("uploads.field_name cannot be empty".into()));
        }

        if self.uploads.max_file_size == 0 {
            return Err(ConfigError::InvalidLimit("max_file_size cannot be 0".into()));
        }

        if self.uploads.allowed_content_types.is_empty() {
            return Err(ConfigError::Invalid(
                "uploads.allowed_content_types cannot be empty".into(),
            ));
        }

        // The body carries the photo plus the text fields.
        if self.limits.max_request_size < self.uploads.max_file_size {
            return Err(ConfigError::InvalidLimit(format!(
                "max_request_size {} is smaller than max_file_size {}",
                self.limits.max_request_size, self.uploads.max_file_size
            )));
        }

        if let Some(ref base) = self.http.public_base_url {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "public_base_url must be an http(s) URL: {}",
                    base
                )));
            }
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 3000)
    pub port: u16,
    /// Origin prefixed to stored photo paths, e.g. `http://localhost:3000`.
    /// `None` yields root-relative `/uploads/...` references.
    pub public_base_url: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
            public_base_url: None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Connection string: `memory://` or `rocksdb://<path>`
    pub uri: Option<String>,
}

/// Storage backend selected by [`StorageConfig::uri`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    RocksDb(PathBuf),
}

impl StorageConfig {
    pub fn backend(&self) -> Result<StorageBackend, ConfigError> {
        let uri = self
            .uri
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingStorageUri)?;

        if uri == "memory://" || uri == "memory:" {
            return Ok(StorageBackend::Memory);
        }
        if let Some(path) = uri.strip_prefix("rocksdb://") {
            if path.is_empty() {
                return Err(ConfigError::InvalidStorageUri(uri.to_string()));
            }
            return Ok(StorageBackend::RocksDb(PathBuf::from(path)));
        }
        Err(ConfigError::InvalidStorageUri(uri.to_string()))
    }
}

/// Photo upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory stored photos are written to and served from
    pub dir: PathBuf,
    /// Multipart field carrying the photo
    pub field_name: String,
    /// Max photo size in bytes (default: 5 MiB)
    pub max_file_size: usize,
    /// Accepted MIME types
    pub allowed_content_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            field_name: "photo".to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_content_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

/// Static asset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Root of the frontend build
    pub public_dir: PathBuf,
    /// Entry document served for unknown paths
    pub index_file: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("public"),
            index_file: "index.html".to_string(),
        }
    }
}

impl AssetsConfig {
    pub fn index_path(&self) -> PathBuf {
        self.public_dir.join(&self.index_file)
    }
}

/// Request limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max request body size in bytes (default: 8 MiB)
    pub max_request_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size: 8 * 1024 * 1024,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers ("*" for all)
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec![
                "GET".to_string(),
                "HEAD".to_string(),
                "POST".to_string(),
                "OPTIONS".to_string(),
            ],
            allowed_headers: vec!["*".to_string()],
            max_age: 86400, // 24 hours
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No storage connection string supplied
    #[error("storage URI is not set")]
    MissingStorageUri,
    /// Storage connection string with an unknown scheme or empty path
    #[error("unsupported storage URI: {0}")]
    InvalidStorageUri(String),
    /// Invalid size limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.storage.uri = Some("memory://".into());
        config
    }

    #[test]
    fn test_default_config_needs_storage() {
        let config = GatewayConfig::default();
        assert_eq!(config.validate(), Err(ConfigError::MissingStorageUri));
        assert!(memory_config().validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = memory_config();
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.http_addr().port(), 3000);
        assert_eq!(config.uploads.max_file_size, 5 * 1024 * 1024);
        assert_eq!(config.uploads.field_name, "photo");
        assert_eq!(config.uploads.dir, PathBuf::from("uploads"));
        assert_eq!(config.assets.index_path(), PathBuf::from("public/index.html"));
    }

    #[test]
    fn test_storage_backends() {
        let mut storage = StorageConfig::default();
        storage.uri = Some("memory://".into());
        assert_eq!(storage.backend(), Ok(StorageBackend::Memory));

        storage.uri = Some("rocksdb://./data/registrations".into());
        assert_eq!(
            storage.backend(),
            Ok(StorageBackend::RocksDb(PathBuf::from("./data/registrations")))
        );

        storage.uri = Some("rocksdb://".into());
        assert!(matches!(storage.backend(), Err(ConfigError::InvalidStorageUri(_))));

        storage.uri = Some("mongodb://localhost:27017/exam".into());
        assert!(matches!(storage.backend(), Err(ConfigError::InvalidStorageUri(_))));

        storage.uri = Some("   ".into());
        assert_eq!(storage.backend(), Err(ConfigError::MissingStorageUri));
    }

    #[test]
    fn test_request_limit_must_fit_file() {
        let mut config = memory_config();
        config.limits.max_request_size = config.uploads.max_file_size - 1;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLimit(_))));
    }

    #[test]
    fn test_zero_file_size_rejected() {
        let mut config = memory_config();
        config.uploads.max_file_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLimit(_))));
    }

    #[test]
    fn test_base_url_scheme() {
        let mut config = memory_config();
        config.http.public_base_url = Some("localhost:3000".into());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.http.public_base_url = Some("https://exam.example.ac.th".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: GatewayConfig = serde_json::from_value(serde_json::json!({
            "http": { "port": 8080 },
            "storage": { "uri": "memory://" }
        }))
        .unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.uploads.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert!(config.validate().is_ok());
    }
}
