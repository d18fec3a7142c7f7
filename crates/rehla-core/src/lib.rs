//! Rehla Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation shared across the rehla back-office toolkit.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::AdminConfig;
pub use error::AppError;
pub use models::gallery::{GalleryItem, GalleryPlan, UploadPayload};
pub use models::trip::{ReorderRequest, TripResponse};
