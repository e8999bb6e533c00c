use thiserror::Error;

/// Failure of the multipart upload call.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("upload rejected with status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid image part: {0}")]
    InvalidPart(#[source] reqwest::Error),
}

/// Failure of the follow-up list query that resolves the image id.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("list request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("list rejected with status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed list response: {0}")]
    Decode(String),
    #[error("list response contained no images")]
    Empty,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for UploadError {
    fn from(e: reqwest::Error) -> Self {
        UploadError::Transport(e)
    }
}

impl From<reqwest::Error> for ListError {
    fn from(e: reqwest::Error) -> Self {
        ListError::Transport(e)
    }
}
