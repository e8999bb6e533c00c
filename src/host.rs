//! Capabilities the hosting editor hands to the plugin.

use async_trait::async_trait;
use std::sync::Arc;

use crate::paste::PasteOutcome;

/// File payload behind a clipboard item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ClipboardFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), mime: mime.into(), bytes }
    }

    /// Name sent with the upload. Unnamed files become `image.<subtype>`.
    pub fn upload_name(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        let subtype = self
            .mime
            .split_once('/')
            .map(|(_, sub)| sub.split([';', '+']).next().unwrap_or_default().trim())
            .unwrap_or_default();
        if subtype.is_empty() {
            "image".to_string()
        } else {
            format!("image.{}", subtype)
        }
    }
}

/// One entry of the clipboard data transfer.
#[derive(Debug, Clone)]
pub struct ClipboardItem {
    mime: String,
    file: Option<ClipboardFile>,
}

impl ClipboardItem {
    /// An item that carries a file, e.g. a copied screenshot.
    pub fn file(file: ClipboardFile) -> Self {
        Self { mime: file.mime.clone(), file: Some(file) }
    }

    /// An item with no file payload, e.g. `text/plain`.
    pub fn data(mime: impl Into<String>) -> Self {
        Self { mime: mime.into(), file: None }
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// The file payload, if the item has one with actual bytes.
    pub fn as_file(&self) -> Option<&ClipboardFile> {
        self.file.as_ref().filter(|f| !f.bytes.is_empty())
    }
}

/// A paste notification as delivered by the host.
#[derive(Debug, Clone, Default)]
pub struct PasteEvent {
    items: Vec<ClipboardItem>,
    default_prevented: bool,
}

impl PasteEvent {
    pub fn new(items: Vec<ClipboardItem>) -> Self {
        Self { items, default_prevented: false }
    }

    pub fn items(&self) -> &[ClipboardItem] {
        &self.items
    }

    /// Tell the host to skip its own paste handling.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// The active editor.
pub trait Editor: Send + Sync {
    /// Replace the current selection (or insert at the cursor) with `text`.
    fn replace_selection(&self, text: &str);
}

#[async_trait]
pub trait PasteListener: Send + Sync {
    async fn on_paste(&self, event: &mut PasteEvent, editor: &dyn Editor) -> PasteOutcome;
}

/// Event subscription surface of the host workspace.
pub trait Workspace {
    fn on_editor_paste(&mut self, listener: Arc<dyn PasteListener>);
}
