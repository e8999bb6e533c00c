use std::sync::Arc;

use crate::host::{PasteListener, Workspace};
use crate::paste::PasteInterceptor;
use crate::panel::SettingsPanel;
use crate::state::SettingsStore;
use crate::storage::SettingsStorage;
use crate::upload::UploadClient;

/// A loaded plugin instance.
pub struct ImageUploadPlugin {
    store: Arc<SettingsStore>,
}

impl ImageUploadPlugin {
    /// Load settings and register the paste handler with the host.
    pub async fn onload(storage: Arc<dyn SettingsStorage>, workspace: &mut dyn Workspace) -> Self {
        Self::onload_with_client(storage, workspace, UploadClient::new()).await
    }

    pub async fn onload_with_client(
        storage: Arc<dyn SettingsStorage>,
        workspace: &mut dyn Workspace,
        client: UploadClient,
    ) -> Self {
        let store = Arc::new(SettingsStore::load(storage).await);
        let interceptor: Arc<dyn PasteListener> = Arc::new(PasteInterceptor::new(store.clone(), client));
        workspace.on_editor_paste(interceptor);
        tracing::info!("image upload plugin loaded");
        Self { store }
    }

    pub fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    pub fn settings_panel(&self) -> SettingsPanel {
        SettingsPanel::new(self.store.clone())
    }
}
