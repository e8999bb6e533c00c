use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

use crate::config::Settings;
use crate::error::{ListError, UploadError};
use crate::host::ClipboardFile;
use crate::paste::{enter, PipelineStage};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Part type used when the clipboard type is not a valid MIME string.
const FALLBACK_MIME: &str = "application/octet-stream";

static HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(2)
        .build()
}

fn get_client() -> &'static reqwest::Client {
    HTTP_CLIENT.get_or_init(|| {
        build_client(DEFAULT_TIMEOUT).unwrap_or_else(|e| {
            tracing::warn!("falling back to default http client: {}", e);
            reqwest::Client::new()
        })
    })
}

#[derive(Serialize)]
struct ListRequest<'a> {
    count: u32,
    page: u32,
    user_id: &'a str,
}

#[derive(Deserialize)]
struct ListResponse {
    data: ListData,
}

#[derive(Deserialize)]
struct ListData {
    results: Vec<ImageEntry>,
}

#[derive(Deserialize)]
struct ImageEntry {
    id: String,
}

/// Result of one upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Upload accepted and an id was resolved.
    Uploaded(String),
    /// Upload accepted but the id could not be resolved.
    Unresolved,
    /// Upload rejected or never reached the host.
    Failed,
}

impl UploadOutcome {
    /// The resolved id, or the empty string.
    pub fn into_id(self) -> String {
        match self {
            UploadOutcome::Uploaded(id) => id,
            UploadOutcome::Unresolved | UploadOutcome::Failed => String::new(),
        }
    }
}

fn api_key_header(api_key: &str) -> String {
    format!("Api-Key {}", api_key)
}

fn preview(body: &str) -> String {
    body.chars().take(500).collect()
}

/// Client for the image host HTTP API.
#[derive(Clone)]
pub struct UploadClient {
    http: reqwest::Client,
}

impl Default for UploadClient {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadClient {
    /// Uses the process-wide client.
    pub fn new() -> Self {
        Self { http: get_client().clone() }
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self { http: build_client(timeout)? })
    }

    /// Upload `file` and return its id, or `""` on any failure.
    pub async fn upload_image(&self, settings: &Settings, file: &ClipboardFile) -> String {
        self.upload(settings, file).await.into_id()
    }

    /// Upload `file`, then resolve the id of the newest image owned by the user.
    ///
    /// The upload response carries no id, so the id comes from a second call
    /// listing the single most recent image for `user_id`. Another upload by
    /// the same user landing in between makes this return the wrong id.
    pub async fn upload(&self, settings: &Settings, file: &ClipboardFile) -> UploadOutcome {
        enter(PipelineStage::Uploading);
        if let Err(e) = self.upload_file(settings, file).await {
            tracing::error!("image upload failed: {}", e);
            return UploadOutcome::Failed;
        }

        enter(PipelineStage::Listing);
        match self.latest_image_id(settings).await {
            Ok(id) => {
                tracing::info!(image_id = %id, "image uploaded successfully");
                UploadOutcome::Uploaded(id)
            }
            Err(e) => {
                tracing::error!("image id lookup failed: {}", e);
                UploadOutcome::Unresolved
            }
        }
    }

    /// POST `file` as the multipart field `image`. The response body is ignored.
    pub async fn upload_file(&self, settings: &Settings, file: &ClipboardFile) -> Result<(), UploadError> {
        let url = format!("{}/api/image/upload", settings.api_url);
        let part = |mime: &str| {
            Part::bytes(file.bytes.clone())
                .file_name(file.upload_name())
                .mime_str(mime)
        };
        let part = match part(&file.mime) {
            Ok(part) => part,
            Err(e) => {
                tracing::warn!(mime = %file.mime, "unusable image type, sending as {}: {}", FALLBACK_MIME, e);
                part(FALLBACK_MIME).map_err(UploadError::InvalidPart)?
            }
        };
        let form = Form::new().part("image", part);

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, api_key_header(&settings.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Status(status));
        }
        Ok(())
    }

    /// Id of the most recent image listed for the configured user.
    pub async fn latest_image_id(&self, settings: &Settings) -> Result<String, ListError> {
        let url = format!("{}/api/image/list", settings.api_url);
        let request = ListRequest { count: 1, page: 0, user_id: &settings.user_id };
        let body = serde_json::to_vec(&request).map_err(|e| ListError::Decode(e.to_string()))?;

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, api_key_header(&settings.api_key))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ListError::Status(status));
        }

        let list: ListResponse = serde_json::from_str(&body)
            .map_err(|e| ListError::Decode(format!("{} - body: {}", e, preview(&body))))?;

        list.data
            .results
            .into_iter()
            .next()
            .map(|entry| entry.id)
            .ok_or(ListError::Empty)
    }
}
