//! The gallery submission planner.
//!
//! Given the desired ordered sequence of gallery items, produce the two
//! fields the upload endpoint accepts (`existingImages` kept list + ordered
//! `images` attachments) such that the stored order afterwards equals the
//! desired order.

use percent_encoding::percent_decode_str;
use rehla_core::models::gallery::{GalleryItem, GalleryPlan, UploadPayload};
use tracing::debug;

use crate::error::GalleryError;
use crate::fetcher::ImageFetcher;

/// Fallback filename when the URL's last path segment is unusable.
const FALLBACK_FILENAME: &str = "reupload.jpg";

/// Origin of the configured API base, used to decide whether an existing
/// image's bytes can be re-fetched (root-relative, or same scheme/host/port).
#[derive(Debug, Clone)]
pub struct ApiOrigin {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl ApiOrigin {
    pub fn parse(base_url: &str) -> Result<Self, GalleryError> {
        let url = reqwest::Url::parse(base_url)
            .map_err(|e| GalleryError::InvalidOrigin(format!("{}: {}", base_url, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| GalleryError::InvalidOrigin(format!("{} has no host", base_url)))?
            .to_string();
        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port_or_known_default(),
        })
    }

    /// Whether an image reference is safe to fetch: root-relative URLs are
    /// served by the API host itself; absolute URLs must match the origin.
    pub fn allows(&self, reference: &str) -> bool {
        if reference.starts_with('/') {
            return true;
        }
        match reqwest::Url::parse(reference) {
            Ok(url) => {
                url.scheme() == self.scheme
                    && url.host_str() == Some(self.host.as_str())
                    && url.port_or_known_default() == self.port
            }
            Err(_) => false,
        }
    }
}

/// One ordered attachment slot in the outline.
#[derive(Debug, Clone)]
pub enum UploadSlot {
    /// A pending upload whose bytes are already in memory.
    Inline(UploadPayload),
    /// An already-stored image that must be re-downloaded and re-attached
    /// to force its new position.
    Refetch { url: String, filename: String },
}

/// Pure planning result: the kept references plus the ordered attachment
/// slots still to be materialized. No bytes have been fetched yet.
#[derive(Debug, Clone, Default)]
pub struct SubmissionOutline {
    pub kept: Vec<String>,
    pub slots: Vec<UploadSlot>,
}

impl SubmissionOutline {
    /// References the outline will fetch when materialized.
    pub fn refetch_urls(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter_map(|slot| match slot {
                UploadSlot::Refetch { url, .. } => Some(url.as_str()),
                UploadSlot::Inline(_) => None,
            })
            .collect()
    }
}

/// Decide the kept list and the ordered attachments for the desired sequence.
///
/// * Mixed case (at least one pending upload): everything before the first
///   pending upload stays in the kept list verbatim; everything from it
///   onward is attached in order, already-stored images via a forced
///   re-upload. Because the server honors the kept list's order, existing
///   items before that index may appear in any permutation.
/// * Pure reorder (no pending uploads): if the reference order is unchanged
///   from `baseline`, keep everything. Otherwise force exactly one re-upload:
///   the last fetch-safe item in the desired order moves to the attachment
///   list and every other item stays kept, preserving the desired order.
///   With no fetch-safe item the reorder cannot be expressed and planning
///   fails with [`GalleryError::ReorderRequiresNewImage`].
/// * Empty sequence: empty outline (callers reject empty galleries before
///   submit).
pub fn plan_submission(
    items: &[GalleryItem],
    baseline: &[String],
    origin: &ApiOrigin,
) -> Result<SubmissionOutline, GalleryError> {
    if items.is_empty() {
        return Ok(SubmissionOutline::default());
    }

    if let Some(first_new) = items.iter().position(GalleryItem::is_new) {
        let kept = items[..first_new]
            .iter()
            .filter_map(|item| item.existing_url().map(str::to_string))
            .collect();
        let slots = items[first_new..]
            .iter()
            .map(|item| match item {
                GalleryItem::New {
                    bytes,
                    filename,
                    content_type,
                    ..
                } => UploadSlot::Inline(UploadPayload {
                    filename: filename.clone(),
                    content_type: content_type.clone(),
                    bytes: bytes.clone(),
                }),
                GalleryItem::Existing { url, .. } => UploadSlot::Refetch {
                    url: url.clone(),
                    filename: filename_from_url(url),
                },
            })
            .collect();
        return Ok(SubmissionOutline { kept, slots });
    }

    // Pure reorder of already-stored images.
    let desired: Vec<&str> = items
        .iter()
        .filter_map(GalleryItem::existing_url)
        .collect();

    if desired.iter().copied().eq(baseline.iter().map(String::as_str)) {
        // Order unchanged, nothing to force.
        return Ok(SubmissionOutline {
            kept: desired.iter().map(|s| s.to_string()).collect(),
            slots: Vec::new(),
        });
    }

    let picked = desired
        .iter()
        .rposition(|url| origin.allows(url))
        .ok_or(GalleryError::ReorderRequiresNewImage)?;

    let kept = desired
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != picked)
        .map(|(_, url)| url.to_string())
        .collect();
    let url = desired[picked].to_string();
    let filename = filename_from_url(&url);

    Ok(SubmissionOutline {
        kept,
        slots: vec![UploadSlot::Refetch { url, filename }],
    })
}

/// Resolve the outline's forced re-uploads into a ready-to-send plan.
///
/// Fetch failure for any required re-upload aborts the whole operation; no
/// partial plan is returned.
pub async fn materialize(
    outline: SubmissionOutline,
    fetcher: &dyn ImageFetcher,
) -> Result<GalleryPlan, GalleryError> {
    let mut uploads = Vec::with_capacity(outline.slots.len());
    for slot in outline.slots {
        match slot {
            UploadSlot::Inline(payload) => uploads.push(payload),
            UploadSlot::Refetch { url, filename } => {
                debug!(%url, "fetching existing image for forced re-upload");
                let bytes = fetcher
                    .fetch(&url)
                    .await
                    .map_err(|source| GalleryError::FetchFailed {
                        url: url.clone(),
                        source,
                    })?;
                let content_type = content_type_for_filename(&filename).to_string();
                uploads.push(UploadPayload {
                    filename,
                    content_type,
                    bytes,
                });
            }
        }
    }

    Ok(GalleryPlan {
        kept: outline.kept,
        uploads,
    })
}

/// Plan and materialize in one step.
pub async fn plan_gallery(
    items: &[GalleryItem],
    baseline: &[String],
    origin: &ApiOrigin,
    fetcher: &dyn ImageFetcher,
) -> Result<GalleryPlan, GalleryError> {
    let outline = plan_submission(items, baseline, origin)?;
    materialize(outline, fetcher).await
}

/// Filename for a forced re-upload: the URL's last path segment,
/// percent-decoded, with `reupload.jpg` as the fallback.
fn filename_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    if decoded.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        decoded.into_owned()
    }
}

fn content_type_for_filename(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    /// Fetcher that records every URL it is asked for.
    struct RecordingFetcher {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingFetcher {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageFetcher for RecordingFetcher {
        async fn fetch(&self, url: &str) -> anyhow::Result<Bytes> {
            self.calls.lock().unwrap().push(url.to_string());
            Ok(Bytes::from(format!("bytes-of:{}", url)))
        }
    }

    /// Fetcher that always fails.
    struct FailingFetcher;

    #[async_trait]
    impl ImageFetcher for FailingFetcher {
        async fn fetch(&self, _url: &str) -> anyhow::Result<Bytes> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    fn origin() -> ApiOrigin {
        ApiOrigin::parse("https://admin.example.com").unwrap()
    }

    fn existing(url: &str) -> GalleryItem {
        GalleryItem::existing(url)
    }

    fn new_item(name: &str) -> GalleryItem {
        GalleryItem::new_upload(vec![0u8; 4], name, "image/jpeg")
    }

    fn urls(items: &[GalleryItem]) -> Vec<String> {
        items
            .iter()
            .filter_map(|i| i.existing_url().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_existing_prefix_then_new_tail() {
        // [Existing(a), Existing(b), New(c)] keeps a,b and attaches c.
        let items = vec![
            existing("/uploads/a.jpg"),
            existing("/uploads/b.jpg"),
            new_item("c.jpg"),
        ];
        let baseline = urls(&items);
        let outline = plan_submission(&items, &baseline, &origin()).unwrap();

        assert_eq!(outline.kept, vec!["/uploads/a.jpg", "/uploads/b.jpg"]);
        assert_eq!(outline.slots.len(), 1);
        assert!(matches!(&outline.slots[0], UploadSlot::Inline(p) if p.filename == "c.jpg"));
        assert!(outline.refetch_urls().is_empty());
    }

    #[test]
    fn test_all_new_tail_preserves_order() {
        // Existing prefix untouched, new suffix uploaded in order.
        let items = vec![
            existing("/uploads/a.jpg"),
            existing("/uploads/b.jpg"),
            new_item("c.jpg"),
            new_item("d.jpg"),
        ];
        let baseline = urls(&items);
        let outline = plan_submission(&items, &baseline, &origin()).unwrap();

        assert_eq!(outline.kept, vec!["/uploads/a.jpg", "/uploads/b.jpg"]);
        let names: Vec<_> = outline
            .slots
            .iter()
            .map(|s| match s {
                UploadSlot::Inline(p) => p.filename.clone(),
                UploadSlot::Refetch { filename, .. } => filename.clone(),
            })
            .collect();
        assert_eq!(names, vec!["c.jpg", "d.jpg"]);
    }

    #[test]
    fn test_existing_after_new_is_refetched() {
        // Interleaved sequence: the existing image dragged behind a pending
        // upload moves to the attachment list.
        let items = vec![
            existing("/uploads/a.jpg"),
            new_item("c.jpg"),
            existing("/uploads/b.jpg"),
        ];
        let baseline = vec!["/uploads/a.jpg".to_string(), "/uploads/b.jpg".to_string()];
        let outline = plan_submission(&items, &baseline, &origin()).unwrap();

        assert_eq!(outline.kept, vec!["/uploads/a.jpg"]);
        assert_eq!(outline.refetch_urls(), vec!["/uploads/b.jpg"]);
        assert!(matches!(&outline.slots[0], UploadSlot::Inline(p) if p.filename == "c.jpg"));
        assert!(
            matches!(&outline.slots[1], UploadSlot::Refetch { filename, .. } if filename == "b.jpg")
        );
    }

    #[test]
    fn test_pure_reorder_picks_last_fetch_safe_item() {
        // [a, b] reordered to [b, a], both same-origin.
        let items = vec![existing("/uploads/b.jpg"), existing("/uploads/a.jpg")];
        let baseline = vec!["/uploads/a.jpg".to_string(), "/uploads/b.jpg".to_string()];
        let outline = plan_submission(&items, &baseline, &origin()).unwrap();

        assert_eq!(outline.kept, vec!["/uploads/b.jpg"]);
        assert_eq!(outline.refetch_urls(), vec!["/uploads/a.jpg"]);
    }

    #[tokio::test]
    async fn test_pure_reorder_committed_order_matches_desired() {
        // kept ++ uploads equals the desired permutation.
        let items = vec![
            existing("/uploads/c.jpg"),
            existing("/uploads/a.jpg"),
            existing("/uploads/b.jpg"),
        ];
        let baseline = vec![
            "/uploads/a.jpg".to_string(),
            "/uploads/b.jpg".to_string(),
            "/uploads/c.jpg".to_string(),
        ];
        let fetcher = RecordingFetcher::new();
        let plan = plan_gallery(&items, &baseline, &origin(), &fetcher)
            .await
            .unwrap();

        // Last item (b) is fetch-safe and re-uploaded; the rest stay kept in
        // desired order, so the committed order is c, a, b.
        assert_eq!(plan.kept, vec!["/uploads/c.jpg", "/uploads/a.jpg"]);
        assert_eq!(plan.uploads.len(), 1);
        assert_eq!(plan.uploads[0].filename, "b.jpg");
        assert_eq!(fetcher.calls(), vec!["/uploads/b.jpg"]);
    }

    #[test]
    fn test_unchanged_order_forces_nothing() {
        // Untouched gallery, even a foreign-hosted
        // single item, plans with no re-upload and no error.
        let items = vec![existing("https://cdn.foreign.example/a.jpg")];
        let baseline = vec!["https://cdn.foreign.example/a.jpg".to_string()];
        let outline = plan_submission(&items, &baseline, &origin()).unwrap();

        assert_eq!(outline.kept, vec!["https://cdn.foreign.example/a.jpg"]);
        assert!(outline.slots.is_empty());
    }

    #[test]
    fn test_all_foreign_reorder_fails() {
        // A genuine reorder with no fetch-safe item cannot be expressed.
        let items = vec![
            existing("https://cdn.foreign.example/b.jpg"),
            existing("https://cdn.foreign.example/a.jpg"),
        ];
        let baseline = vec![
            "https://cdn.foreign.example/a.jpg".to_string(),
            "https://cdn.foreign.example/b.jpg".to_string(),
        ];
        let err = plan_submission(&items, &baseline, &origin()).unwrap_err();
        assert!(matches!(err, GalleryError::ReorderRequiresNewImage));
    }

    #[test]
    fn test_reorder_with_one_same_origin_item_succeeds() {
        let items = vec![
            existing("https://cdn.foreign.example/b.jpg"),
            existing("https://admin.example.com/uploads/a.jpg"),
            existing("https://cdn.foreign.example/c.jpg"),
        ];
        let baseline = vec![
            "https://admin.example.com/uploads/a.jpg".to_string(),
            "https://cdn.foreign.example/b.jpg".to_string(),
            "https://cdn.foreign.example/c.jpg".to_string(),
        ];
        let outline = plan_submission(&items, &baseline, &origin()).unwrap();

        // The same-origin item is the only candidate even though a foreign
        // item sits after it.
        assert_eq!(
            outline.refetch_urls(),
            vec!["https://admin.example.com/uploads/a.jpg"]
        );
        assert_eq!(
            outline.kept,
            vec![
                "https://cdn.foreign.example/b.jpg",
                "https://cdn.foreign.example/c.jpg"
            ]
        );
    }

    #[test]
    fn test_empty_sequence_plans_empty() {
        let outline = plan_submission(&[], &[], &origin()).unwrap();
        assert!(outline.kept.is_empty());
        assert!(outline.slots.is_empty());
    }

    #[tokio::test]
    async fn test_kept_items_are_never_fetched() {
        // Only items at or after the first pending upload hit the fetcher.
        let items = vec![
            existing("/uploads/a.jpg"),
            existing("/uploads/b.jpg"),
            new_item("c.jpg"),
            existing("/uploads/d.jpg"),
        ];
        let baseline = vec![
            "/uploads/a.jpg".to_string(),
            "/uploads/b.jpg".to_string(),
            "/uploads/d.jpg".to_string(),
        ];
        let fetcher = RecordingFetcher::new();
        let plan = plan_gallery(&items, &baseline, &origin(), &fetcher)
            .await
            .unwrap();

        assert_eq!(fetcher.calls(), vec!["/uploads/d.jpg"]);
        assert_eq!(plan.kept, vec!["/uploads/a.jpg", "/uploads/b.jpg"]);
        assert_eq!(plan.uploads.len(), 2);
        assert_eq!(plan.uploads[0].filename, "c.jpg");
        assert_eq!(plan.uploads[1].filename, "d.jpg");
        assert_eq!(plan.uploads[1].content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_whole_plan() {
        let items = vec![existing("/uploads/b.jpg"), existing("/uploads/a.jpg")];
        let baseline = vec!["/uploads/a.jpg".to_string(), "/uploads/b.jpg".to_string()];
        let err = plan_gallery(&items, &baseline, &origin(), &FailingFetcher)
            .await
            .unwrap_err();
        assert!(
            matches!(err, GalleryError::FetchFailed { ref url, .. } if url == "/uploads/a.jpg")
        );
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(filename_from_url("/uploads/a.jpg"), "a.jpg");
        assert_eq!(
            filename_from_url("https://admin.example.com/uploads/beach%20day.png?v=2"),
            "beach day.png"
        );
        assert_eq!(filename_from_url("https://admin.example.com/"), FALLBACK_FILENAME);
        assert_eq!(filename_from_url(""), FALLBACK_FILENAME);
    }

    #[test]
    fn test_origin_allows() {
        let origin = origin();
        assert!(origin.allows("/uploads/a.jpg"));
        assert!(origin.allows("https://admin.example.com/uploads/a.jpg"));
        assert!(origin.allows("https://admin.example.com:443/uploads/a.jpg"));
        assert!(!origin.allows("http://admin.example.com/uploads/a.jpg"));
        assert!(!origin.allows("https://cdn.foreign.example/a.jpg"));
        assert!(!origin.allows("not a url"));
    }

    #[test]
    fn test_content_type_for_filename() {
        assert_eq!(content_type_for_filename("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for_filename("a.webp"), "image/webp");
        assert_eq!(content_type_for_filename("noext"), "application/octet-stream");
    }
}
