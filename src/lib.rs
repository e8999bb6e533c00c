pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod panel;
pub mod paste;
pub mod plugin;
pub mod reference;
pub mod state;
pub mod storage;
pub mod upload;

pub use config::{Settings, SettingsPatch};
pub use host::{ClipboardFile, ClipboardItem, Editor, PasteEvent, PasteListener, Workspace};
pub use paste::{PasteInterceptor, PasteOutcome};
pub use plugin::ImageUploadPlugin;
pub use upload::{UploadClient, UploadOutcome};
