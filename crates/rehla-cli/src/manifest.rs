//! Gallery manifest: the desired final order of a trip's photos, as a JSON
//! file. Each entry is either an already-stored image (by URL) or a local
//! file to upload. `baseline` is the stored order as it was when editing
//! started; the planner uses it to tell a real reorder from a no-op.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use uuid::Uuid;

use rehla_core::models::gallery::GalleryItem;

#[derive(Debug, Deserialize)]
pub struct GalleryManifest {
    pub trip_id: Uuid,
    #[serde(default)]
    pub baseline: Vec<String>,
    pub items: Vec<ManifestItem>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ManifestItem {
    /// An image already on the server, addressed by its reference URL.
    Existing { url: String },
    /// A local file to upload at this position.
    File { path: PathBuf },
}

pub fn load_manifest(path: &Path) -> Result<GalleryManifest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse manifest: {}", path.display()))
}

/// Read local files and build the ordered gallery sequence.
pub fn build_items(manifest: &GalleryManifest) -> Result<Vec<GalleryItem>> {
    manifest
        .items
        .iter()
        .map(|entry| match entry {
            ManifestItem::Existing { url } => Ok(GalleryItem::existing(url.clone())),
            ManifestItem::File { path } => {
                let bytes = fs::read(path)
                    .with_context(|| format!("Failed to read file: {}", path.display()))?;
                let filename = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("image.jpg")
                    .to_string();
                let content_type = content_type_for_path(path).to_string();
                Ok(GalleryItem::new_upload(bytes, filename, content_type))
            }
        })
        .collect()
}

fn content_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
