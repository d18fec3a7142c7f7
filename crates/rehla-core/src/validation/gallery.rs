//! Gallery validation
//!
//! Checks run before the submission planner: the non-empty invariant, id
//! uniqueness, the gallery size cap, and file allowlists for newly selected
//! images. All of these reject before any network call happens.

use std::collections::HashSet;

use crate::config::AdminConfig;
use crate::error::AppError;
use crate::models::gallery::GalleryItem;

/// Validate a gallery sequence ahead of submission.
pub fn validate_gallery(items: &[GalleryItem], config: &AdminConfig) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::EmptyGallery);
    }

    if items.len() > config.max_gallery_items {
        return Err(AppError::InvalidInput(format!(
            "Gallery has {} images, maximum is {}",
            items.len(),
            config.max_gallery_items
        )));
    }

    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id()) {
            return Err(AppError::InvalidInput(format!(
                "Duplicate gallery item id: {}",
                item.id()
            )));
        }
    }

    for item in items {
        if let GalleryItem::New {
            bytes,
            filename,
            content_type,
            ..
        } = item
        {
            validate_new_image(filename, content_type, bytes.len(), config)?;
        }
    }

    Ok(())
}

/// Validate a newly selected file against the configured allowlists.
pub fn validate_new_image(
    filename: &str,
    content_type: &str,
    size_bytes: usize,
    config: &AdminConfig,
) -> Result<(), AppError> {
    if size_bytes == 0 {
        return Err(AppError::InvalidInput(format!(
            "File '{}' is empty",
            filename
        )));
    }

    if size_bytes > config.max_image_size_bytes {
        return Err(AppError::InvalidInput(format!(
            "File '{}' is {} bytes, maximum is {}",
            filename, size_bytes, config.max_image_size_bytes
        )));
    }

    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    if !config.allowed_image_extensions.contains(&extension) {
        return Err(AppError::InvalidInput(format!(
            "File extension '{}' is not allowed",
            extension
        )));
    }

    let content_type = content_type.to_lowercase();
    if !config.allowed_image_content_types.contains(&content_type) {
        return Err(AppError::InvalidInput(format!(
            "Content type '{}' is not allowed",
            content_type
        )));
    }

    Ok(())
}
