use reqwest::Client;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiResult;
use crate::model::{Movie, MovieList};
use super::decode_json;

/// Read-only client for the movie metadata API.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
    image_base: String,
}

impl TmdbClient {
    pub fn new(base_url: &str, api_key: &str, language: &str, image_base: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            language: language.to_string(),
            image_base: image_base.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.tmdb_base_url,
            config.api_key(),
            &config.language,
            &config.image_base_url,
        )
    }

    pub fn image_base(&self) -> &str {
        &self.image_base
    }

    pub async fn popular(&self, page: u32) -> ApiResult<MovieList> {
        let url = format!("{}/movie/popular", self.base_url);
        debug!(page, "fetching popular movies");
        let page = page.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("page", page.as_str()),
            ])
            .send()
            .await?;

        decode_json(response).await
    }

    pub async fn search(&self, query: &str, page: u32) -> ApiResult<MovieList> {
        let url = format!("{}/search/movie", self.base_url);
        debug!(query, page, "searching movies");
        let page = page.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("query", query),
                ("page", page.as_str()),
            ])
            .send()
            .await?;

        decode_json(response).await
    }

    /// First search hit for `query`, if any.
    pub async fn search_first(&self, query: &str) -> ApiResult<Option<Movie>> {
        let list = self.search(query, 1).await?;
        Ok(list.results.and_then(|results| results.into_iter().next()))
    }
}
