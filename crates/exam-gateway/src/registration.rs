//! Registration use case.
//!
//! `Received -> Validating -> {Rejected | Persisting -> {Committed | Failed}}`.
//! The photo is already on disk when a submission arrives here; every path
//! that does not commit removes it.

use crate::adapters::{PhotoStore, StoredPhoto};
use crate::domain::{
    messages, validate_form, FieldError, GatewayConfig, Registration, RegistrationError,
    RegistrationForm, RegistrationId,
};
use crate::ports::{Clock, RegistrationStore};
use std::sync::Arc;
use tracing::{error, info};

/// A parsed multipart request.
#[derive(Debug, Default)]
pub struct Submission {
    /// Text fields by wire name
    pub form: RegistrationForm,
    /// The accepted photo, if one was stored
    pub photo: Option<StoredPhoto>,
    /// Client-side upload failures (type, size, stray file parts)
    pub upload_errors: Vec<FieldError>,
}

impl Submission {
    /// Remove the stored photo, if any.
    pub async fn discard_photo(&mut self, photos: &PhotoStore) {
        if let Some(photo) = self.photo.take() {
            photos.discard(&photo).await;
        }
    }
}

/// Validates submissions and commits them to the store.
pub struct RegistrationService {
    store: Arc<dyn RegistrationStore>,
    photos: PhotoStore,
    clock: Arc<dyn Clock>,
    public_base_url: Option<String>,
}

impl RegistrationService {
    pub fn new(
        config: &GatewayConfig,
        store: Arc<dyn RegistrationStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            photos: PhotoStore::new(&config.uploads, Arc::clone(&clock)),
            clock,
            public_base_url: config
                .http
                .public_base_url
                .as_deref()
                .map(|base| base.trim_end_matches('/').to_string()),
        }
    }

    pub fn photos(&self) -> &PhotoStore {
        &self.photos
    }

    /// URL under which a stored photo is served.
    pub fn photo_reference(&self, file_name: &str) -> String {
        match self.public_base_url {
            Some(ref base) => format!("{}/uploads/{}", base, file_name),
            None => format!("/uploads/{}", file_name),
        }
    }

    /// Validate and persist one submission.
    ///
    /// Field errors, upload errors and a missing photo are reported together.
    /// Nothing is persisted unless all of them are absent.
    pub async fn submit(
        &self,
        submission: Submission,
    ) -> Result<RegistrationId, RegistrationError> {
        let Submission {
            form,
            photo,
            upload_errors,
        } = submission;
        let photo_field = self.photos.field_name();

        let (validated, mut errors) = match validate_form(&form) {
            Ok(validated) => (Some(validated), Vec::new()),
            Err(errors) => (None, errors),
        };
        errors.extend(upload_errors);
        if photo.is_none() && !errors.iter().any(|e| e.field() == Some(photo_field)) {
            errors.push(FieldError::file(photo_field, messages::PHOTO_REQUIRED));
        }

        let (form, photo) = match (validated, photo) {
            (Some(form), Some(photo)) if errors.is_empty() => (form, photo),
            (_, photo) => {
                if let Some(photo) = photo {
                    self.photos.discard(&photo).await;
                }
                info!(errors = errors.len(), "Registration rejected");
                return Err(RegistrationError::Validation(errors));
            }
        };

        let registration = Registration {
            id: RegistrationId::new(),
            citizen_id: form.citizen_id,
            title: form.title,
            first_name: form.first_name,
            last_name: form.last_name,
            birth_date: form.birth_date,
            education_level: form.education_level,
            school: form.school,
            address: form.address,
            phone: form.phone,
            email: form.email,
            exam_center: form.exam_center,
            subjects: form.subjects,
            photo_path: self.photo_reference(&photo.file_name),
            created_at: self.clock.now(),
        };

        if let Err(e) = self.store.insert(&registration).await {
            self.photos.discard(&photo).await;
            error!(error = %e, "Failed to persist registration");
            return Err(e.into());
        }

        info!(
            id = %registration.id,
            photo = %photo.file_name,
            content_type = %photo.content_type,
            size = photo.size,
            subjects = registration.subjects.len(),
            "Registration committed"
        );
        Ok(registration.id)
    }
}
