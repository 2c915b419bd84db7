use reqwest::Client;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiResult;
use crate::model::{ChatRequest, ChatResponse, EmotionStat, TopMovie};
use super::decode_json;

/// Client for the recommendation backend (`/chat`, `/stats`, `/top10`).
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.backend_url)
    }

    pub async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse> {
        let url = format!("{}/chat", self.base_url);
        debug!(turn = ?request.turn, "sending chat message");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await?;

        decode_json(response).await
    }

    pub async fn stats(&self) -> ApiResult<Vec<EmotionStat>> {
        let url = format!("{}/stats", self.base_url);
        debug!("fetching emotion stats");

        let response = self.client.get(&url).send().await?;
        decode_json(response).await
    }

    pub async fn top10(&self) -> ApiResult<Vec<TopMovie>> {
        let url = format!("{}/top10", self.base_url);
        debug!("fetching top10 movies");

        let response = self.client.get(&url).send().await?;
        decode_json(response).await
    }
}
