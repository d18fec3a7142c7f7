//! Domain methods for the rehla admin API client.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};
use uuid::Uuid;

use rehla_core::models::gallery::GalleryPlan;
use rehla_core::models::trip::{ReorderRequest, TripResponse};

use crate::{api_prefix, ApiClient};

/// JSON error envelope the backend returns in place of data.
#[derive(Debug, serde::Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

impl ApiClient {
    /// Replace a trip's gallery: `existingImages` carries the kept
    /// references comma-joined in final order, and each upload payload is
    /// attached as an `images` file part, in order. The server stores
    /// kept-order then attachment-order.
    pub async fn submit_trip_gallery(
        &self,
        trip_id: Uuid,
        plan: &GalleryPlan,
    ) -> Result<TripResponse> {
        let mut form = Form::new().text("existingImages", plan.kept.join(","));

        for upload in &plan.uploads {
            let part = Part::bytes(upload.bytes.to_vec())
                .file_name(upload.filename.clone())
                .mime_str(&upload.content_type)
                .with_context(|| {
                    format!("Invalid content type: {}", upload.content_type)
                })?;
            form = form.part("images", part);
        }

        debug!(
            %trip_id,
            kept = plan.kept.len(),
            uploads = plan.uploads.len(),
            "submitting gallery"
        );
        self.post_multipart(&format!("{}/trips/{}/images", api_prefix(), trip_id), form)
            .await
    }

    /// Persist a manual drag-drop trip ordering in one batch call.
    pub async fn reorder_trips(&self, ordered_ids: Vec<Uuid>) -> Result<()> {
        let body = ReorderRequest { ordered_ids };
        self.post_json_unit(&format!("{}/trips/reorder", api_prefix()), &body)
            .await
    }

    /// List trips with pagination.
    pub async fn list_trips(&self, limit: i64, offset: i64) -> Result<Vec<TripResponse>> {
        let query = vec![("limit", limit.to_string()), ("offset", offset.to_string())];
        self.get(&format!("{}/trips", api_prefix()), &query).await
    }

    /// Get a single trip by ID.
    pub async fn get_trip(&self, trip_id: Uuid) -> Result<TripResponse> {
        self.get(&format!("{}/trips/{}", api_prefix(), trip_id), &[])
            .await
    }

    /// Delete a trip by ID.
    pub async fn delete_trip(&self, trip_id: Uuid) -> Result<()> {
        self.delete(&format!("{}/trips/{}", api_prefix(), trip_id))
            .await
    }

    /// Download a raw CSV export for a resource (providers, customers,
    /// bookings, ...).
    ///
    /// The endpoint answers `text/csv` or `application/octet-stream` with
    /// data; an `application/json` body is an error envelope and its
    /// `message` is surfaced instead of being parsed as CSV.
    pub async fn download_export(&self, resource: &str) -> Result<Vec<u8>> {
        let path = format!("{}/export/{}", api_prefix(), resource);
        let (body, content_type) = self.get_bytes(&path, &[]).await?;

        let content_type = content_type.unwrap_or_default().to_lowercase();
        if content_type.starts_with("application/json") {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Export failed".to_string());
            return Err(anyhow::anyhow!("Export failed: {}", message));
        }

        if !content_type.is_empty()
            && !content_type.starts_with("text/csv")
            && !content_type.starts_with("application/octet-stream")
        {
            warn!(%content_type, resource, "unexpected export content type");
            return Err(anyhow::anyhow!(
                "Export returned unexpected content type: {}",
                content_type
            ));
        }

        Ok(body.to_vec())
    }
}
