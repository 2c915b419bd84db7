pub mod backend;
pub mod tmdb;

pub use backend::BackendClient;
pub use tmdb::TmdbClient;

use serde::de::DeserializeOwned;
use crate::error::{ApiError, ApiResult};

/// Check the status, then decode the body. Decode failures stay distinct from transport ones.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    if !status.is_success() {
        // Drop the query so the API key never ends up in an error message.
        let mut url = response.url().clone();
        url.set_query(None);
        return Err(ApiError::Status {
            status,
            url: url.to_string(),
        });
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
