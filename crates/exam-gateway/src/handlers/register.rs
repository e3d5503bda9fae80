//! `POST /api/register`.
//!
//! Reads the multipart body part by part. Text parts fill the form; the
//! photo part is streamed straight to the upload directory. Everything
//! after that is [`RegistrationService::submit`].

use super::AppState;
use crate::adapters::PhotoStore;
use crate::domain::{messages, FieldError, RegistrationError, UploadError};
use crate::registration::{RegistrationService, Submission};
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub id: String,
}

pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RegisterResponse>, RegistrationError> {
    let service: &RegistrationService = &state.registrations;

    let submission = match multipart {
        Ok(multipart) => read_submission(multipart, service.photos()).await?,
        // Declared multipart but unparseable, e.g. no boundary.
        Err(rejection) if is_multipart(&headers) => {
            debug!(reason = %rejection.body_text(), "Malformed multipart request");
            return Err(RegistrationError::Validation(vec![FieldError::request(
                rejection.body_text(),
            )]));
        }
        // Not a multipart body: every field is missing, and so is the photo.
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "Register request is not multipart");
            Submission::default()
        }
    };

    let id = service.submit(submission).await?;
    Ok(Json(RegisterResponse {
        message: messages::REGISTERED,
        id: id.to_string(),
    }))
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().to_ascii_lowercase().starts_with("multipart/"))
}

/// Drain the multipart body into a [`Submission`].
///
/// If reading fails part way, a photo already written is removed.
pub async fn read_submission(
    mut multipart: Multipart,
    photos: &PhotoStore,
) -> Result<Submission, RegistrationError> {
    let mut submission = Submission::default();
    match read_parts(&mut multipart, photos, &mut submission).await {
        Ok(()) => Ok(submission),
        Err(e) => {
            submission.discard_photo(photos).await;
            Err(e)
        }
    }
}

async fn read_parts(
    multipart: &mut Multipart,
    photos: &PhotoStore,
    submission: &mut Submission,
) -> Result<(), RegistrationError> {
    let photo_field = photos.field_name();
    let mut photo_seen = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(()),
            Err(e) => return Err(truncated_body(e, photo_field, submission)),
        };
        let name = field.name().unwrap_or_default().to_string();

        if field.file_name().is_none() {
            let value = field.text().await.map_err(|e| {
                RegistrationError::Validation(vec![FieldError::file(name.as_str(), e.body_text())])
            })?;
            if !submission.form.set_field(&name, value) {
                debug!(field = %name, "Ignoring unknown form field");
            }
            continue;
        }

        let rejected = if name != photo_field {
            Some(UploadError::UnexpectedField { field: name })
        } else if photo_seen {
            Some(UploadError::TooManyFiles { field: name })
        } else {
            None
        };
        if let Some(e) = rejected {
            submission.upload_errors.push(e.into_field_error(photo_field)?);
            continue;
        }
        photo_seen = true;

        let original_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        match photos
            .store(original_name.as_deref(), content_type.as_deref(), field)
            .await
        {
            Ok(photo) => submission.photo = Some(photo),
            Err(e) => submission.upload_errors.push(e.into_field_error(photo_field)?),
        }
    }
}

/// Errors for a body that stopped parsing part way.
///
/// An oversized photo is skipped, then the body limit trips while draining the
/// rest of it. In that case the photo error already collected is the answer.
fn truncated_body(
    error: MultipartError,
    photo_field: &str,
    submission: &mut Submission,
) -> RegistrationError {
    let mut errors = std::mem::take(&mut submission.upload_errors);
    let photo_reported = errors.iter().any(|e| e.field() == Some(photo_field));
    if !photo_reported && error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        errors.push(FieldError::file(photo_field, messages::PHOTO_TOO_LARGE));
    } else if !photo_reported {
        errors = vec![FieldError::request(error.body_text())];
    }
    debug!(reason = %error.body_text(), errors = errors.len(), "Multipart body ended early");
    RegistrationError::Validation(errors)
}
