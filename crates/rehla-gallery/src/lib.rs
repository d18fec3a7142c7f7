//! Gallery submission planning for trip photo galleries.
//!
//! The upload endpoint is stateless and has exactly two knobs: a list of
//! existing image references to keep (order as given) and newly attached
//! files (appended after the kept ones, in attachment order). There is no
//! "move existing image to position K" primitive, so reorders that touch
//! already-stored images are expressed by re-downloading those images and
//! re-attaching them as if new.
//!
//! The planner is split in two: [`plan_submission`] is a pure function that
//! decides which references stay in the kept list and which items must be
//! uploaded; [`materialize`] resolves the forced re-uploads by fetching bytes
//! through an [`ImageFetcher`]. Bytes are fetched only for items selected for
//! re-upload, never for kept items.

pub mod editor;
pub mod engine;
pub mod error;
pub mod fetcher;

pub use editor::{EditorState, GalleryEditor};
pub use engine::{
    materialize, plan_gallery, plan_submission, ApiOrigin, SubmissionOutline, UploadSlot,
};
pub use error::GalleryError;
pub use fetcher::ImageFetcher;
