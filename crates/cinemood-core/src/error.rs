use reqwest::StatusCode;

/// Failure of a single request against the metadata API or the backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request to {url} failed with status {status}")]
    Status { status: StatusCode, url: String },
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;
