//! Shared helpers for the rehla CLI binaries.

pub mod manifest;
pub mod presets;
