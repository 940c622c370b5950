// ABOUTME: Signing photo payload decoding and filesystem blob storage
// ABOUTME: Accepts multipart uploads or base64 data URLs and writes dated, collision-free files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

//! # Photo Attachment
//!
//! The photo step accepts either a direct file upload or a camera capture sent
//! as a `data:<mime>;base64,<bytes>` URL. Either way the image lands under
//! `<media_root>/signing_photos/YYYY/MM/` and the database stores the path
//! relative to the media root.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::constants::photos::{
    image_type, image_type_for_extension, FILE_PREFIX, MAX_PHOTO_BYTES, UPLOAD_DIR,
};
use crate::errors::{AppError, AppResult};

/// Longest kept portion of an uploaded file name
const MAX_FILE_NAME_LEN: usize = 100;

/// Attempts at finding a free file name within one second
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Photo as submitted by the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoPayload {
    /// Multipart file field `photo`
    Upload {
        /// Original file name, if the browser sent one
        file_name: Option<String>,
        /// Declared MIME type
        content_type: Option<String>,
        /// File contents
        bytes: Vec<u8>,
    },
    /// Form field `photo_data` holding a data URL
    DataUrl(String),
}

/// Image decoded from a data URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Canonical MIME type, e.g. `image/png`
    pub mime: String,
    /// File extension for the MIME type
    pub extension: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

/// Decode a `data:<mime>;base64,<bytes>` URL
///
/// # Errors
///
/// Returns `InvalidFormat` when the `;base64,` separator is missing, the MIME
/// type is not an accepted image type, or the body is empty, not valid
/// base64, or larger than [`MAX_PHOTO_BYTES`]
pub fn decode_data_url(data_url: &str) -> AppResult<DecodedImage> {
    let (header, body) = data_url
        .trim()
        .split_once(";base64,")
        .ok_or_else(|| AppError::invalid_format("Photo data is not a base64 data URL"))?;

    let declared = header.strip_prefix("data:").unwrap_or(header).trim();
    let (mime, extension) = image_type(declared)
        .ok_or_else(|| AppError::invalid_format(format!("Unsupported photo type: {declared}")))?;

    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| AppError::invalid_format(format!("Photo data is not valid base64: {e}")))?;
    check_size(&bytes)?;

    Ok(DecodedImage {
        mime: mime.to_owned(),
        extension: extension.to_owned(),
        bytes,
    })
}

/// Accepted MIME type and extension of an uploaded file
///
/// The declared content type wins; without one the file name extension
/// decides.
///
/// # Errors
///
/// Returns `InvalidFormat` when neither names an accepted image type
pub fn upload_image_type(
    file_name: Option<&str>,
    content_type: Option<&str>,
) -> AppResult<(&'static str, &'static str)> {
    let resolved = match content_type.map(str::trim).filter(|c| !c.is_empty()) {
        Some(declared) => image_type(declared),
        None => file_name
            .and_then(|name| name.rsplit_once('.'))
            .and_then(|(_, ext)| image_type_for_extension(ext)),
    };
    resolved.ok_or_else(|| {
        AppError::invalid_format(format!(
            "Unsupported photo type: {}",
            content_type.or(file_name).unwrap_or("unknown")
        ))
    })
}

fn check_size(bytes: &[u8]) -> AppResult<()> {
    if bytes.is_empty() {
        return Err(AppError::invalid_format("Photo data is empty"));
    }
    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(AppError::invalid_format(format!(
            "Photo is larger than {} MB",
            MAX_PHOTO_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Reduce an uploaded file name to a safe single path component
#[must_use]
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILE_NAME_LEN)
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "photo".to_owned()
    } else {
        cleaned.to_owned()
    }
}

/// Blob written by [`PhotoStore::store`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    /// Path relative to the media root, with `/` separators
    pub relative_path: String,
    /// MIME type, when known
    pub content_type: Option<String>,
}

/// Filesystem store for signing photos
#[derive(Debug, Clone)]
pub struct PhotoStore {
    media_root: PathBuf,
}

impl PhotoStore {
    /// Create a store rooted at `media_root`
    #[must_use]
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    /// Root directory of all blobs
    #[must_use]
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Absolute location of a stored blob
    #[must_use]
    pub fn resolve(&self, relative_path: &str) -> PathBuf {
        self.media_root.join(relative_path)
    }

    /// Decode and write `payload`, named after `now`
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` for a malformed, empty, oversized or non-image
    /// payload, or `StorageError` if the file cannot be written
    pub async fn store(&self, payload: &PhotoPayload, now: DateTime<Utc>) -> AppResult<StoredPhoto> {
        let stamp = now.format("%Y%m%d_%H%M%S");
        let (stem, extension, bytes, content_type) = match payload {
            PhotoPayload::DataUrl(data_url) => {
                let image = decode_data_url(data_url)?;
                (
                    format!("{FILE_PREFIX}_{stamp}"),
                    image.extension,
                    image.bytes,
                    image.mime,
                )
            }
            PhotoPayload::Upload {
                file_name,
                content_type,
                bytes,
            } => {
                let (mime, extension) =
                    upload_image_type(file_name.as_deref(), content_type.as_deref())?;
                check_size(bytes)?;
                let safe_name = sanitize_file_name(file_name.as_deref().unwrap_or_default());
                let base = safe_name
                    .rsplit_once('.')
                    .map_or(safe_name.as_str(), |(head, _)| head);
                (
                    format!("{FILE_PREFIX}_{stamp}_{base}"),
                    extension.to_owned(),
                    bytes.clone(),
                    mime.to_owned(),
                )
            }
        };

        let directory = format!("{UPLOAD_DIR}/{}", now.format("%Y/%m"));
        let absolute_dir = self.media_root.join(&directory);
        tokio::fs::create_dir_all(&absolute_dir).await.map_err(|e| {
            AppError::storage(format!(
                "Failed to create photo directory {}: {e}",
                absolute_dir.display()
            ))
        })?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = candidate_name(&stem, &extension, attempt);
            let absolute = absolute_dir.join(&file_name);

            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&absolute)
                .await
            {
                Ok(mut file) => {
                    if let Err(e) = write_all(&mut file, &bytes).await {
                        drop(file);
                        let _ = tokio::fs::remove_file(&absolute).await;
                        return Err(AppError::storage(format!(
                            "Failed to write photo {}: {e}",
                            absolute.display()
                        )));
                    }
                    debug!(path = %absolute.display(), size = bytes.len(), "Stored signing photo");
                    return Ok(StoredPhoto {
                        relative_path: format!("{directory}/{file_name}"),
                        content_type: Some(content_type),
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(e) => {
                    return Err(AppError::storage(format!(
                        "Failed to create photo {}: {e}",
                        absolute.display()
                    )));
                }
            }
        }

        Err(AppError::storage(format!(
            "No free photo name for {stem} after {MAX_NAME_ATTEMPTS} attempts"
        )))
    }

    /// Delete a blob written by `store`; failures are logged only
    pub async fn remove(&self, relative_path: &str) {
        let absolute = self.resolve(relative_path);
        if let Err(e) = tokio::fs::remove_file(&absolute).await {
            warn!(path = %absolute.display(), error = %e, "Failed to remove orphaned photo");
        }
    }
}

async fn write_all(file: &mut tokio::fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}

fn candidate_name(stem: &str, extension: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{stem}.{extension}")
    } else {
        format!("{stem}_{attempt}.{extension}")
    }
}
