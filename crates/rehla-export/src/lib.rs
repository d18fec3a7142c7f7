//! CSV export post-processing.
//!
//! The backend's export endpoints return raw CSV; every export screen then
//! reshapes it client-side (rename columns, drop internal ones, derive masked
//! values) before handing the file to the user. The source app duplicated
//! that reshaping five times; here it lives once.

pub mod transform;

pub use transform::{ColumnTransform, ExportError, ExportTransformer, Row, UTF8_BOM};
