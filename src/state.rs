use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::{Settings, SettingsPatch};
use crate::error::StorageError;
use crate::storage::SettingsStorage;

/// In-memory settings, written through to the host storage on every edit.
pub struct SettingsStore {
    settings: RwLock<Settings>,
    storage: Arc<dyn SettingsStorage>,
    // Held across apply + save so saves land in edit order.
    save_lock: tokio::sync::Mutex<()>,
}

impl SettingsStore {
    /// Load persisted settings merged over the defaults.
    ///
    /// A storage failure is logged and the store starts from defaults.
    pub async fn load(storage: Arc<dyn SettingsStorage>) -> Self {
        let persisted = match storage.load().await {
            Ok(blob) => blob,
            Err(e) => {
                tracing::error!("failed to load settings, using defaults: {}", e);
                None
            }
        };
        let settings = Settings::from_persisted(persisted.as_ref());
        tracing::debug!(api_url = %settings.api_url, "settings loaded");
        Self::new(settings, storage)
    }

    pub fn new(settings: Settings, storage: Arc<dyn SettingsStorage>) -> Self {
        Self { settings: RwLock::new(settings), storage, save_lock: tokio::sync::Mutex::new(()) }
    }

    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    /// Merge `patch` into the current settings and persist the full record.
    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<(), StorageError> {
        let _guard = self.save_lock.lock().await;
        let snapshot = {
            let mut settings = self.settings.write();
            settings.apply(patch);
            settings.to_persisted()?
        };
        self.storage.save(&snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_API_URL;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    #[tokio::test]
    async fn updates_merge_and_persist_full_record() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SettingsStore::load(storage.clone()).await;

        store.update_settings(SettingsPatch::api_key("k1")).await.unwrap();
        store.update_settings(SettingsPatch::user_id("u1")).await.unwrap();

        assert_eq!(
            storage.snapshot(),
            Some(json!({ "apiUrl": DEFAULT_API_URL, "apiKey": "k1", "userId": "u1" }))
        );
        assert_eq!(storage.save_count(), 2);
        assert_eq!(store.settings().user_id, "u1");
    }

    /// Storage whose first save is slow, so an unserialized second save would finish first.
    #[derive(Default)]
    struct SlowFirstSave {
        saves: parking_lot::Mutex<usize>,
        data: parking_lot::Mutex<Option<serde_json::Value>>,
    }

    #[async_trait::async_trait]
    impl SettingsStorage for SlowFirstSave {
        async fn load(&self) -> Result<Option<serde_json::Value>, StorageError> {
            Ok(self.data.lock().clone())
        }

        async fn save(&self, data: &serde_json::Value) -> Result<(), StorageError> {
            let first = {
                let mut saves = self.saves.lock();
                *saves += 1;
                *saves == 1
            };
            if first {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
            *self.data.lock() = Some(data.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn overlapping_updates_persist_in_order() {
        let storage = Arc::new(SlowFirstSave::default());
        let store = SettingsStore::load(storage.clone()).await;

        let (a, b) = tokio::join!(
            store.update_settings(SettingsPatch::api_key("k1")),
            store.update_settings(SettingsPatch::user_id("u1")),
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(
            *storage.data.lock(),
            Some(json!({ "apiUrl": DEFAULT_API_URL, "apiKey": "k1", "userId": "u1" }))
        );
    }

    #[tokio::test]
    async fn load_merges_partial_blob_over_defaults() {
        let storage = Arc::new(MemoryStorage::with_data(json!({ "apiUrl": "https://h.test" })));
        let store = SettingsStore::load(storage).await;
        let settings = store.settings();
        assert_eq!(settings.api_url, "https://h.test");
        assert_eq!(settings.api_key, "");
    }
}
