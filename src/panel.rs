use std::sync::Arc;

use crate::config::{Settings, SettingsPatch};
use crate::error::StorageError;
use crate::state::SettingsStore;

pub const HEADING: &str = "General settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    ApiUrl,
    ApiKey,
    UserId,
}

impl SettingField {
    pub const ALL: [SettingField; 3] = [SettingField::ApiUrl, SettingField::ApiKey, SettingField::UserId];

    pub fn name(self) -> &'static str {
        match self {
            SettingField::ApiUrl => "API Url",
            SettingField::ApiKey => "API Key",
            SettingField::UserId => "User-Id",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SettingField::ApiUrl => "URL to picsur. Defaults to 'https://example.com'.",
            SettingField::ApiKey => "Api-Key for picsur. Defaults to ''.",
            SettingField::UserId => "UserId for picsur. Defaults to ''.",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            SettingField::ApiUrl => "https://example.com",
            SettingField::ApiKey | SettingField::UserId => "",
        }
    }

    fn value(self, settings: &Settings) -> &str {
        match self {
            SettingField::ApiUrl => &settings.api_url,
            SettingField::ApiKey => &settings.api_key,
            SettingField::UserId => &settings.user_id,
        }
    }

    fn patch(self, value: &str) -> SettingsPatch {
        match self {
            SettingField::ApiUrl => SettingsPatch::api_url(value),
            SettingField::ApiKey => SettingsPatch::api_key(value),
            SettingField::UserId => SettingsPatch::user_id(value),
        }
    }
}

/// A rendered text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub field: SettingField,
    pub name: &'static str,
    pub description: &'static str,
    pub placeholder: &'static str,
    pub value: String,
}

/// Settings form with one text field per setting.
pub struct SettingsPanel {
    store: Arc<SettingsStore>,
}

impl SettingsPanel {
    pub fn new(store: Arc<SettingsStore>) -> Self {
        Self { store }
    }

    pub fn heading(&self) -> &'static str {
        HEADING
    }

    pub fn display(&self) -> Vec<FieldView> {
        let settings = self.store.settings();
        SettingField::ALL
            .into_iter()
            .map(|field| FieldView {
                field,
                name: field.name(),
                description: field.description(),
                placeholder: field.placeholder(),
                value: field.value(&settings).to_string(),
            })
            .collect()
    }

    /// Change handler for a field. Empty input is ignored.
    pub async fn on_change(&self, field: SettingField, value: &str) -> Result<(), StorageError> {
        if value.is_empty() {
            return Ok(());
        }
        self.store.update_settings(field.patch(value)).await
    }
}
