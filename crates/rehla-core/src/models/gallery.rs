//! Gallery item and submission plan models.
//!
//! A trip's photo gallery is edited as an ordered sequence of `GalleryItem`s.
//! The sequence order is the single source of truth for display order and for
//! the order ultimately persisted server-side. Items are never mutated in
//! place by a reorder; a reorder is a pure permutation of the sequence.

use bytes::Bytes;
use uuid::Uuid;

/// One entry in a trip's ordered photo gallery.
///
/// `id` is unique within the sequence and stable across reorders (it is a
/// render/drag key, not an ownership token).
#[derive(Debug, Clone)]
pub enum GalleryItem {
    /// An image already stored server-side, addressed by a root-relative
    /// (`/uploads/...`) or absolute URL.
    Existing { id: Uuid, url: String },
    /// A locally selected file not yet persisted server-side.
    New {
        id: Uuid,
        bytes: Bytes,
        filename: String,
        content_type: String,
    },
}

impl GalleryItem {
    pub fn existing(url: impl Into<String>) -> Self {
        GalleryItem::Existing {
            id: Uuid::new_v4(),
            url: url.into(),
        }
    }

    pub fn new_upload(
        bytes: impl Into<Bytes>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        GalleryItem::New {
            id: Uuid::new_v4(),
            bytes: bytes.into(),
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            GalleryItem::Existing { id, .. } => *id,
            GalleryItem::New { id, .. } => *id,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, GalleryItem::New { .. })
    }

    /// Reference URL for an already-stored image, `None` for pending uploads.
    pub fn existing_url(&self) -> Option<&str> {
        match self {
            GalleryItem::Existing { url, .. } => Some(url),
            GalleryItem::New { .. } => None,
        }
    }
}

/// A binary file part ready to be attached to the upload request.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// The two fields the stateless upload endpoint accepts.
///
/// The server's stored order equals `kept` followed by `uploads` in
/// attachment order.
#[derive(Debug, Clone, Default)]
pub struct GalleryPlan {
    /// Existing image references to retain, in final order.
    pub kept: Vec<String>,
    /// Files to attach after the kept list, in order.
    pub uploads: Vec<UploadPayload>,
}

impl GalleryPlan {
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty() && self.uploads.is_empty()
    }

    pub fn total_len(&self) -> usize {
        self.kept.len() + self.uploads.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_ids_are_unique_and_stable() {
        let a = GalleryItem::existing("/uploads/a.jpg");
        let b = GalleryItem::existing("/uploads/b.jpg");
        assert_ne!(a.id(), b.id());

        let a_clone = a.clone();
        assert_eq!(a.id(), a_clone.id());
    }

    #[test]
    fn test_existing_url_accessor() {
        let a = GalleryItem::existing("/uploads/a.jpg");
        assert_eq!(a.existing_url(), Some("/uploads/a.jpg"));
        assert!(!a.is_new());

        let n = GalleryItem::new_upload(vec![1u8, 2, 3], "c.jpg", "image/jpeg");
        assert_eq!(n.existing_url(), None);
        assert!(n.is_new());
    }

    #[test]
    fn test_empty_plan() {
        let plan = GalleryPlan::default();
        assert!(plan.is_empty());
        assert_eq!(plan.total_len(), 0);
    }
}
