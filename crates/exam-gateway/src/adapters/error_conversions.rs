//! HTTP mapping for registration errors.
//!
//! Validation failures are the client's to fix and come back as 400 with the
//! full error list. Storage and filesystem failures are 500s.

use crate::domain::{messages, FieldError, RegistrationError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ValidationErrorBody {
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct ServerErrorBody {
    pub error: &'static str,
    pub detail: String,
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        match self {
            RegistrationError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(ValidationErrorBody { errors })).into_response()
            }
            RegistrationError::Storage(e) => server_error(e.to_string()),
            RegistrationError::Upload(e) => server_error(e.to_string()),
        }
    }
}

fn server_error(detail: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ServerErrorBody {
            error: messages::SERVER_ERROR,
            detail,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StoreError, UploadError};
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let err = RegistrationError::Validation(vec![FieldError::file("photo", "File too large")]);
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"errors": [{"msg": "File too large", "path": "photo"}]})
        );
    }

    #[tokio::test]
    async fn test_duplicate_is_server_error() {
        let err = RegistrationError::Storage(StoreError::Duplicate {
            identity_number: "1234567890121".into(),
        });
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], messages::SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("1234567890121"));
    }

    #[tokio::test]
    async fn test_upload_io_is_server_error() {
        let err: RegistrationError = UploadError::Io(std::io::Error::other("disk full")).into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
