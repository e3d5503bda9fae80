//! # Photo Upload Adapter
//!
//! Streams the applicant photo to the upload directory.
//!
//! Files are named `<field>-<millis><ext>` and created with `create_new`, so
//! two submissions landing in the same millisecond never share a file: the
//! loser bumps the timestamp and tries again. The size limit is enforced
//! chunk by chunk and a rejected file is removed before returning.

use crate::domain::{UploadConfig, UploadError};
use crate::ports::Clock;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Name collisions tolerated before giving up.
const MAX_NAME_ATTEMPTS: i64 = 1_000;

/// Longest original extension carried over to the stored name.
const MAX_EXTENSION_LEN: usize = 10;

/// A photo written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    /// Final file name inside the upload directory
    pub file_name: String,
    /// Full path of the stored file
    pub path: PathBuf,
    /// Normalized MIME type the client declared
    pub content_type: String,
    /// Bytes written
    pub size: usize,
}

/// Upload directory plus the constraints a photo must meet.
pub struct PhotoStore {
    dir: PathBuf,
    field_name: String,
    max_file_size: usize,
    allowed_content_types: Vec<String>,
    clock: Arc<dyn Clock>,
}

impl PhotoStore {
    pub fn new(config: &UploadConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: config.dir.clone(),
            field_name: config.field_name.clone(),
            max_file_size: config.max_file_size,
            allowed_content_types: config
                .allowed_content_types
                .iter()
                .map(|t| t.to_ascii_lowercase())
                .collect(),
            clock,
        }
    }

    /// Multipart field the photo must arrive under.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Check a declared content type against the allow-list.
    ///
    /// Parameters such as `; charset=...` are ignored and the comparison is
    /// case-insensitive. Returns the normalized type.
    pub fn check_content_type(&self, content_type: Option<&str>) -> Result<String, UploadError> {
        let normalized = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if self.allowed_content_types.iter().any(|t| *t == normalized) {
            Ok(normalized)
        } else {
            Err(UploadError::UnsupportedType {
                content_type: content_type.unwrap_or("").to_string(),
            })
        }
    }

    /// Write one photo from a chunk stream.
    ///
    /// The type check runs before anything touches the disk. On any failure
    /// after the file was created, the partial file is removed.
    pub async fn store<S, E>(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        chunks: S,
    ) -> Result<StoredPhoto, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: fmt::Display,
    {
        let content_type = self.check_content_type(content_type)?;
        let (file, file_name, path) = self.create_unique(original_name).await?;

        match self.copy_limited(file, chunks).await {
            Ok(size) => {
                debug!(file = %file_name, size, "Stored upload");
                Ok(StoredPhoto {
                    file_name,
                    path,
                    content_type,
                    size,
                })
            }
            Err(e) => {
                remove_quietly(&path).await;
                Err(e)
            }
        }
    }

    /// Remove a stored photo. Failures are logged, never returned.
    pub async fn discard(&self, photo: &StoredPhoto) {
        remove_quietly(&photo.path).await;
    }

    async fn copy_limited<S, E>(&self, mut file: File, chunks: S) -> Result<usize, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: fmt::Display,
    {
        let mut chunks = std::pin::pin!(chunks);
        let mut written = 0usize;
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| UploadError::Multipart(e.to_string()))?;
            written = written.saturating_add(chunk.len());
            if written > self.max_file_size {
                return Err(UploadError::TooLarge {
                    limit: self.max_file_size,
                });
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(written)
    }

    async fn create_unique(
        &self,
        original_name: Option<&str>,
    ) -> Result<(File, String, PathBuf), UploadError> {
        let extension = sanitized_extension(original_name);
        let base_millis = self.clock.now().timestamp_millis();

        for bump in 0..MAX_NAME_ATTEMPTS {
            let file_name = format!("{}-{}{}", self.field_name, base_millis + bump, extension);
            let path = self.dir.join(&file_name);
            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => return Ok((file, file_name, path)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(UploadError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free upload name after {} attempts", MAX_NAME_ATTEMPTS),
        )))
    }
}

/// `.ext` from the client's file name, case kept; empty when absent or odd.
fn sanitized_extension(original_name: Option<&str>) -> String {
    let Some(name) = original_name else {
        return String::new();
    };
    // Clients on Windows may send the full path.
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && (1..=MAX_EXTENSION_LEN).contains(&ext.len())
                && ext.bytes().all(|b| b.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext)
        }
        _ => String::new(),
    }
}

async fn remove_quietly(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "Removed upload"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove upload"),
    }
}
