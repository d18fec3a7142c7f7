//! The gallery editor owns the mutable item sequence between user gestures.
//!
//! It is the client-side counterpart of the edit form: seeded from server
//! data (every initial item is existing) or created empty for a new trip,
//! mutated by file selection, deletion, and drag-drop permutation, then
//! consumed read-only by the planner at submit time. While a submission is
//! in flight the editor is locked; mutations are rejected until `finish` or
//! `fail` returns it to `Idle`.

use bytes::Bytes;
use rehla_core::models::gallery::GalleryItem;
use uuid::Uuid;

use crate::error::GalleryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Submitting,
}

#[derive(Debug)]
pub struct GalleryEditor {
    items: Vec<GalleryItem>,
    /// Reference order as loaded from the server, used to detect whether a
    /// pure reorder actually changed anything.
    baseline: Vec<String>,
    state: EditorState,
}

impl GalleryEditor {
    /// Editor for a new trip with no stored images.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            baseline: Vec::new(),
            state: EditorState::Idle,
        }
    }

    /// Editor seeded from the server's stored gallery order.
    pub fn from_existing(urls: Vec<String>) -> Self {
        let items = urls.iter().map(|url| GalleryItem::existing(url.clone())).collect();
        Self {
            items,
            baseline: urls,
            state: EditorState::Idle,
        }
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn baseline(&self) -> &[String] {
        &self.baseline
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Append a newly selected file. Returns the new item's id, or an error
    /// while a submission is in flight.
    pub fn push_new(
        &mut self,
        bytes: impl Into<Bytes>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Result<Uuid, GalleryError> {
        self.ensure_idle()?;
        let item = GalleryItem::new_upload(bytes, filename, content_type);
        let id = item.id();
        self.items.push(item);
        Ok(id)
    }

    /// Remove an item by id. Returns whether an item was removed.
    pub fn remove(&mut self, id: Uuid) -> Result<bool, GalleryError> {
        self.ensure_idle()?;
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        Ok(self.items.len() != before)
    }

    /// Move the item at `from` to position `to` (a pure permutation).
    /// Out-of-range indices leave the sequence untouched.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<bool, GalleryError> {
        self.ensure_idle()?;
        if from >= self.items.len() || to >= self.items.len() {
            return Ok(false);
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(true)
    }

    /// Lock the editor for submission and expose the sequence read-only.
    /// Enforces the non-empty invariant before any planning or network work.
    pub fn begin_submit(&mut self) -> Result<&[GalleryItem], GalleryError> {
        self.ensure_idle()?;
        if self.items.is_empty() {
            return Err(GalleryError::EmptyGallery);
        }
        self.state = EditorState::Submitting;
        Ok(&self.items)
    }

    /// Submission succeeded: the committed order becomes the new baseline and
    /// the editor unlocks.
    pub fn finish(&mut self, stored_urls: Vec<String>) {
        self.items = stored_urls
            .iter()
            .map(|url| GalleryItem::existing(url.clone()))
            .collect();
        self.baseline = stored_urls;
        self.state = EditorState::Idle;
    }

    /// Submission failed: unlock and keep the edited sequence for retry.
    pub fn fail(&mut self) {
        self.state = EditorState::Idle;
    }

    fn ensure_idle(&self) -> Result<(), GalleryError> {
        match self.state {
            EditorState::Idle => Ok(()),
            EditorState::Submitting => Err(GalleryError::SubmissionInProgress),
        }
    }
}

impl Default for GalleryEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_editor_has_existing_items_and_baseline() {
        let editor = GalleryEditor::from_existing(vec![
            "/uploads/a.jpg".to_string(),
            "/uploads/b.jpg".to_string(),
        ]);
        assert_eq!(editor.items().len(), 2);
        assert!(editor.items().iter().all(|i| !i.is_new()));
        assert_eq!(editor.baseline().len(), 2);
    }

    #[test]
    fn test_move_item_is_a_permutation() {
        let mut editor = GalleryEditor::from_existing(vec![
            "/uploads/a.jpg".to_string(),
            "/uploads/b.jpg".to_string(),
            "/uploads/c.jpg".to_string(),
        ]);
        let ids_before: Vec<_> = editor.items().iter().map(|i| i.id()).collect();

        assert!(editor.move_item(2, 0).unwrap());
        let ids_after: Vec<_> = editor.items().iter().map(|i| i.id()).collect();
        assert_eq!(ids_after[0], ids_before[2]);
        assert_eq!(ids_after[1], ids_before[0]);
        assert_eq!(ids_after[2], ids_before[1]);

        // Out-of-range moves are no-ops.
        assert!(!editor.move_item(5, 0).unwrap());
    }

    #[test]
    fn test_remove_by_id() {
        let mut editor = GalleryEditor::from_existing(vec!["/uploads/a.jpg".to_string()]);
        let id = editor.items()[0].id();
        assert!(editor.remove(id).unwrap());
        assert!(editor.items().is_empty());
        assert!(!editor.remove(id).unwrap());
    }

    #[test]
    fn test_empty_gallery_cannot_submit() {
        let mut editor = GalleryEditor::new();
        let err = editor.begin_submit().unwrap_err();
        assert!(matches!(err, GalleryError::EmptyGallery));
        assert_eq!(editor.state(), EditorState::Idle);
    }

    #[test]
    fn test_editor_locks_while_submitting() {
        let mut editor = GalleryEditor::from_existing(vec!["/uploads/a.jpg".to_string()]);
        editor.begin_submit().unwrap();
        assert_eq!(editor.state(), EditorState::Submitting);

        assert!(matches!(
            editor.push_new(vec![1u8], "x.jpg", "image/jpeg"),
            Err(GalleryError::SubmissionInProgress)
        ));
        assert!(matches!(
            editor.move_item(0, 0),
            Err(GalleryError::SubmissionInProgress)
        ));

        editor.fail();
        assert_eq!(editor.state(), EditorState::Idle);
        assert!(editor.push_new(vec![1u8], "x.jpg", "image/jpeg").is_ok());
    }

    #[test]
    fn test_finish_resets_baseline_to_committed_order() {
        let mut editor = GalleryEditor::from_existing(vec!["/uploads/a.jpg".to_string()]);
        editor.push_new(vec![1u8], "b.jpg", "image/jpeg").unwrap();
        editor.begin_submit().unwrap();

        editor.finish(vec![
            "/uploads/a.jpg".to_string(),
            "/uploads/b.jpg".to_string(),
        ]);
        assert_eq!(editor.state(), EditorState::Idle);
        assert_eq!(editor.baseline().len(), 2);
        assert!(editor.items().iter().all(|i| !i.is_new()));
    }
}
