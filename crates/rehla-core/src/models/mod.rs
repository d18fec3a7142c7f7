//! Domain models

pub mod gallery;
pub mod trip;

pub use gallery::{GalleryItem, GalleryPlan, UploadPayload};
pub use trip::{ReorderRequest, TripResponse};
