//! Gallery workflow errors.

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    /// A pure reorder of already-stored images was requested, but no image
    /// is safe to re-fetch (none is root-relative or same-origin with the
    /// API base). Submitting anyway would silently persist the wrong order,
    /// so the caller must block submission instead.
    #[error("Reordering requires adding a new image: no existing image can be re-fetched")]
    ReorderRequiresNewImage,

    #[error("Gallery must contain at least one image")]
    EmptyGallery,

    #[error("Gallery is locked while a submission is in flight")]
    SubmissionInProgress,

    #[error("Invalid API base URL: {0}")]
    InvalidOrigin(String),

    #[error("Failed to fetch image bytes from {url}")]
    FetchFailed {
        url: String,
        #[source]
        source: anyhow::Error,
    },
}
