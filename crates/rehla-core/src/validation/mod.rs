//! Validation modules

pub mod gallery;

pub use gallery::{validate_gallery, validate_new_image};
