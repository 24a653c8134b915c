// ABOUTME: Recipe image storage behind the ImageStore trait
// ABOUTME: Local implementation decodes base64 data URLs into files under the media root
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Image Storage
//!
//! Recipe images arrive inline as `data:image/<ext>;base64,<data>` (or bare
//! base64, treated as PNG). The store turns a payload into an opaque
//! reference that is persisted on the recipe row, and can discard a
//! reference when the write that produced it is rolled back.

use crate::config::MediaConfig;
use crate::constants::{fields, media};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Storage for recipe images
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist an image payload and return its reference
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed payload or a storage error
    /// if the image cannot be written
    async fn store(&self, payload: &str) -> AppResult<String>;

    /// Remove a previously stored image; unknown references are ignored
    ///
    /// # Errors
    ///
    /// Returns a storage error if an existing file cannot be removed
    async fn discard(&self, reference: &str) -> AppResult<()>;
}

/// Decoded image payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// File extension without the dot
    pub extension: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

/// Decode a data URL or bare base64 string
///
/// # Errors
///
/// Returns a validation error naming the `image` field when the payload is
/// empty, not base64, or declares an unsupported type
pub fn decode_payload(payload: &str) -> AppResult<DecodedImage> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(AppError::validation(fields::IMAGE, "image is required"));
    }

    let (extension, data) = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest.split_once(";base64,").ok_or_else(|| {
                AppError::validation(fields::IMAGE, "image must be a base64 data URL")
            })?;
            let extension = header
                .strip_prefix("image/")
                .map(str::to_lowercase)
                .ok_or_else(|| AppError::validation(fields::IMAGE, "payload is not an image"))?;
            (extension, data)
        }
        None => (media::DEFAULT_IMAGE_EXTENSION.to_owned(), payload),
    };

    if !media::ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::validation(
            fields::IMAGE,
            format!("unsupported image type: {extension}"),
        ));
    }

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| AppError::validation(fields::IMAGE, format!("image is not valid base64: {e}")))?;
    if bytes.is_empty() {
        return Err(AppError::validation(fields::IMAGE, "image is empty"));
    }

    Ok(DecodedImage { extension, bytes })
}

/// Filesystem image store rooted at the configured media directory
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalImageStore {
    /// Create a store from media configuration
    #[must_use]
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: config.root.clone(),
            url_prefix: config.url.clone(),
        }
    }

    /// Media root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a reference back to a file under the media root
    ///
    /// Returns `None` for references this store did not produce.
    fn path_for(&self, reference: &str) -> Option<PathBuf> {
        let relative = reference.strip_prefix(&self.url_prefix)?;
        if !relative.starts_with(media::RECIPE_IMAGE_DIR) {
            return None;
        }
        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, payload: &str) -> AppResult<String> {
        let image = decode_payload(payload)?;

        let dir = self.root.join(media::RECIPE_IMAGE_DIR);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::storage(format!("Failed to create {}: {e}", dir.display())).with_source(e)
        })?;

        let file_name = format!("{}.{}", Uuid::new_v4(), image.extension);
        let path = dir.join(&file_name);
        tokio::fs::write(&path, &image.bytes).await.map_err(|e| {
            AppError::storage(format!("Failed to write {}: {e}", path.display())).with_source(e)
        })?;

        info!(path = %path.display(), bytes = image.bytes.len(), "Stored recipe image");
        Ok(format!(
            "{}{}/{file_name}",
            self.url_prefix,
            media::RECIPE_IMAGE_DIR
        ))
    }

    async fn discard(&self, reference: &str) -> AppResult<()> {
        let Some(path) = self.path_for(reference) else {
            debug!(reference, "Ignoring foreign image reference");
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "Discarded recipe image");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage(format!(
                "Failed to remove {}: {e}",
                path.display()
            ))
            .with_source(e)),
        }
    }
}
