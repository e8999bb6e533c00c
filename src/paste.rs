use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;

use crate::host::{ClipboardItem, Editor, PasteEvent, PasteListener};
use crate::reference::ReferenceInserter;
use crate::state::SettingsStore;
use crate::upload::{UploadClient, UploadOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    PasteDetected,
    Uploading,
    Listing,
    Inserting,
}

/// How a paste event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    /// No image on the clipboard; the host pastes as usual.
    Ignored,
    /// The image item had no file payload.
    NoPayload,
    /// The upload call failed; the document is untouched.
    UploadFailed,
    /// A reference was inserted. Holds the inserted text.
    Inserted(String),
}

/// Index of the first clipboard item with an `image/*` type.
pub fn find_image_item(items: &[ClipboardItem]) -> Option<usize> {
    items.iter().position(ClipboardItem::is_image)
}

/// Turns pasted images into uploaded image references.
pub struct PasteInterceptor {
    store: Arc<SettingsStore>,
    client: UploadClient,
}

impl PasteInterceptor {
    pub fn new(store: Arc<SettingsStore>, client: UploadClient) -> Self {
        Self { store, client }
    }

    pub async fn handle_paste(&self, event: &mut PasteEvent, editor: &dyn Editor) -> PasteOutcome {
        let run_id = uuid::Uuid::new_v4();
        self.run(event, editor)
            .instrument(tracing::debug_span!("paste", run = %run_id))
            .await
    }

    async fn run(&self, event: &mut PasteEvent, editor: &dyn Editor) -> PasteOutcome {
        let Some(index) = find_image_item(event.items()) else {
            return PasteOutcome::Ignored;
        };
        event.prevent_default();
        enter(PipelineStage::PasteDetected);

        let Some(file) = event.items()[index].as_file().cloned() else {
            tracing::warn!(mime = event.items()[index].mime(), "pasted image has no data");
            enter(PipelineStage::Idle);
            return PasteOutcome::NoPayload;
        };

        // One snapshot for the whole run so upload and link agree on the host.
        let settings = self.store.settings();

        let image_id = match self.client.upload(&settings, &file).await {
            UploadOutcome::Uploaded(id) => id,
            UploadOutcome::Unresolved => String::new(),
            UploadOutcome::Failed => {
                enter(PipelineStage::Idle);
                return PasteOutcome::UploadFailed;
            }
        };

        enter(PipelineStage::Inserting);
        let text = ReferenceInserter::insert(editor, &settings.api_url, &image_id);
        enter(PipelineStage::Idle);
        PasteOutcome::Inserted(text)
    }
}

pub(crate) fn enter(stage: PipelineStage) {
    tracing::debug!(?stage, "paste pipeline stage");
}

#[async_trait]
impl PasteListener for PasteInterceptor {
    async fn on_paste(&self, event: &mut PasteEvent, editor: &dyn Editor) -> PasteOutcome {
        self.handle_paste(event, editor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ClipboardFile;

    fn png(bytes: &[u8]) -> ClipboardItem {
        ClipboardItem::file(ClipboardFile::new("image.png", "image/png", bytes.to_vec()))
    }

    #[test]
    fn finds_first_image_item() {
        let items = vec![ClipboardItem::data("text/plain"), png(b"a"), png(b"b")];
        assert_eq!(find_image_item(&items), Some(1));
    }

    #[test]
    fn no_image_item() {
        let items = vec![ClipboardItem::data("text/plain"), ClipboardItem::data("text/html")];
        assert_eq!(find_image_item(&items), None);
        assert_eq!(find_image_item(&[]), None);
    }

    #[test]
    fn mime_prefix_must_match_exactly() {
        let items = vec![ClipboardItem::data("application/image"), ClipboardItem::data("IMAGE/png")];
        assert_eq!(find_image_item(&items), None);
    }
}
