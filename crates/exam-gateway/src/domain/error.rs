//! Error types for the registration gateway.
//!
//! `FieldError` is the wire-level validation entry; the enums below are the
//! per-layer failures that the HTTP adapter maps to status codes.

use super::messages;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Where a field error originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLocation {
    /// A text field of the submitted form.
    Body,
    /// The uploaded file part.
    File,
    /// Not attributable to a single field (e.g. a malformed body).
    Request,
}

/// A single validation failure.
///
/// Serializes as `{ type?, msg, path?, location?, value? }`:
/// body fields carry `type: "field"` and `location: "body"`, file errors only
/// `msg` and `path`, request-level errors only `msg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub location: FieldLocation,
    pub field: Option<String>,
    pub message: String,
    pub value: Option<String>,
}

impl FieldError {
    /// Failure on a text field, echoing the submitted value if any.
    pub fn body(field: impl Into<String>, message: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            location: FieldLocation::Body,
            field: Some(field.into()),
            message: message.into(),
            value: value.map(str::to_string),
        }
    }

    /// Failure on the uploaded file.
    pub fn file(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: FieldLocation::File,
            field: Some(field.into()),
            message: message.into(),
            value: None,
        }
    }

    /// Failure of the request as a whole.
    pub fn request(message: impl Into<String>) -> Self {
        Self {
            location: FieldLocation::Request,
            field: None,
            message: message.into(),
            value: None,
        }
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl Serialize for FieldError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("FieldError", 5)?;
        if self.location == FieldLocation::Body {
            state.serialize_field("type", "field")?;
        }
        if let Some(ref value) = self.value {
            state.serialize_field("value", value)?;
        }
        state.serialize_field("msg", &self.message)?;
        if let Some(ref field) = self.field {
            state.serialize_field("path", field)?;
        }
        if self.location == FieldLocation::Body {
            state.serialize_field("location", "body")?;
        }
        state.end()
    }
}

/// Storage port failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Unique constraint on the identity number was violated.
    #[error("duplicate key: citizenId {identity_number} is already registered")]
    Duplicate { identity_number: String },

    /// Backend I/O failure.
    #[error("storage I/O error: {message}")]
    Io { message: String },

    /// Record could not be encoded or decoded.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// Backend not reachable or not open.
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },
}

/// Photo upload failures.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("unsupported content type: {content_type}")]
    UnsupportedType { content_type: String },

    #[error("file exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("unexpected file field: {field}")]
    UnexpectedField { field: String },

    #[error("more than one file submitted under {field}")]
    TooManyFiles { field: String },

    #[error("malformed multipart body: {0}")]
    Multipart(String),

    #[error("upload I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Convert a client-side upload failure into a field error on `photo_field`.
    ///
    /// I/O failures are server errors and are handed back unchanged.
    pub fn into_field_error(self, photo_field: &str) -> Result<FieldError, UploadError> {
        let error = match self {
            UploadError::UnsupportedType { .. } => {
                FieldError::file(photo_field, messages::PHOTO_UNSUPPORTED_TYPE)
            }
            UploadError::TooLarge { .. } => {
                FieldError::file(photo_field, messages::PHOTO_TOO_LARGE)
            }
            UploadError::TooManyFiles { field } => {
                FieldError::file(field, messages::PHOTO_TOO_MANY)
            }
            UploadError::UnexpectedField { field } => {
                FieldError::file(field, messages::UNEXPECTED_FIELD)
            }
            UploadError::Multipart(detail) => FieldError::file(photo_field, detail),
            UploadError::Io(e) => return Err(UploadError::Io(e)),
        };
        Ok(error)
    }
}

/// Outcome of a registration attempt that did not commit.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// One or more fields failed validation; nothing was persisted.
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Persistence failed, including duplicate identity numbers.
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// Filesystem failure while handling the upload.
    #[error(transparent)]
    Upload(UploadError),
}

impl From<UploadError> for RegistrationError {
    fn from(e: UploadError) -> Self {
        RegistrationError::Upload(e)
    }
}

/// Service lifecycle errors (not request-level).
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Storage backend could not be opened
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Filesystem or socket failure while serving
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_error_serialization() {
        let err = FieldError::body("phone", "Invalid value", Some("12345"));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "field");
        assert_eq!(json["msg"], "Invalid value");
        assert_eq!(json["path"], "phone");
        assert_eq!(json["location"], "body");
        assert_eq!(json["value"], "12345");
    }

    #[test]
    fn test_file_error_serialization() {
        let err = FieldError::file("photo", "File too large");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({"msg": "File too large", "path": "photo"}));
    }

    #[test]
    fn test_request_error_has_no_path() {
        let json = serde_json::to_value(FieldError::request("bad body")).unwrap();
        assert_eq!(json, serde_json::json!({"msg": "bad body"}));
    }

    #[test]
    fn test_duplicate_message_names_field() {
        let err = StoreError::Duplicate {
            identity_number: "1234567890121".into(),
        };
        assert!(err.to_string().contains("citizenId"));
        assert!(err.to_string().contains("1234567890121"));
    }

    #[test]
    fn test_upload_io_is_server_error() {
        let io = UploadError::Io(std::io::Error::other("disk"));
        assert!(matches!(io.into_field_error("photo"), Err(UploadError::Io(_))));
    }

    #[test]
    fn test_upload_client_errors_map_to_fields() {
        let too_large = UploadError::TooLarge { limit: 1 }.into_field_error("photo").unwrap();
        assert_eq!(too_large.field(), Some("photo"));
        assert_eq!(too_large.message, messages::PHOTO_TOO_LARGE);

        let bad_type = UploadError::UnsupportedType {
            content_type: "image/gif".into(),
        }
        .into_field_error("photo")
        .unwrap();
        assert_eq!(bad_type.message, messages::PHOTO_UNSUPPORTED_TYPE);

        let unexpected = UploadError::UnexpectedField {
            field: "avatar".into(),
        }
        .into_field_error("photo")
        .unwrap();
        assert_eq!(unexpected.field(), Some("avatar"));
    }
}
