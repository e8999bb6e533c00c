use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://example.com";

/// Connection settings for the image host. Always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub api_url: String,
    pub api_key: String,
    pub user_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            user_id: String::new(),
        }
    }
}

/// A partial edit of [`Settings`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub user_id: Option<String>,
}

impl SettingsPatch {
    pub fn api_url(value: impl Into<String>) -> Self {
        Self { api_url: Some(value.into()), ..Self::default() }
    }

    pub fn api_key(value: impl Into<String>) -> Self {
        Self { api_key: Some(value.into()), ..Self::default() }
    }

    pub fn user_id(value: impl Into<String>) -> Self {
        Self { user_id: Some(value.into()), ..Self::default() }
    }
}

impl Settings {
    /// Field-wise merge of `patch` into `self`.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.api_url {
            self.api_url = v;
        }
        if let Some(v) = patch.api_key {
            self.api_key = v;
        }
        if let Some(v) = patch.user_id {
            self.user_id = v;
        }
    }

    /// Merge a persisted blob over the defaults.
    ///
    /// Keys that are missing or not strings keep their default value, unknown
    /// keys are ignored. Anything other than an object yields pure defaults.
    pub fn from_persisted(blob: Option<&Value>) -> Self {
        let mut settings = Self::default();
        let Some(Value::Object(map)) = blob else {
            if let Some(other) = blob.filter(|v| !v.is_null()) {
                tracing::warn!("ignoring persisted settings that are not an object: {}", other);
            }
            return settings;
        };

        let field = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
        settings.apply(SettingsPatch {
            api_url: field("apiUrl"),
            api_key: field("apiKey"),
            user_id: field("userId"),
        });
        settings
    }

    pub fn to_persisted(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Process-level configuration for the command line host.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub settings_path: PathBuf,
    pub http_timeout: Duration,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self {
            settings_path: std::env::var("PICPASTE_SETTINGS")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data.json")),
            http_timeout: std::env::var("PICPASTE_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or_else(|| Duration::from_secs(300)),
        }
    }
}
