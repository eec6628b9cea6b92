//! Reqwest-backed `CatalogService` for a TMDB-compatible HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::{domain::MovieSummary, error::ServiceError};
use url::Url;

use crate::{config::Settings, CatalogService};

#[derive(Debug, Deserialize)]
struct PageResponse {
    results: Vec<MovieSummary>,
}

#[derive(Debug)]
pub struct TmdbCatalog {
    http: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbCatalog {
    pub fn new(settings: &Settings) -> Result<Self, ServiceError> {
        Url::parse(&settings.base_url).map_err(|err| {
            ServiceError::Transport(format!(
                "invalid catalog base url '{}': {err}",
                settings.base_url
            ))
        })?;
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|err| ServiceError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            language: settings.language.clone(),
        })
    }

    async fn fetch_page(
        &self,
        path: &str,
        extra_query: &[(&str, &str)],
    ) -> Result<Vec<MovieSummary>, ServiceError> {
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("page", "1"),
            ])
            .query(extra_query)
            .send()
            .await
            .map_err(|err| ServiceError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
            });
        }

        let page: PageResponse = response
            .json()
            .await
            .map_err(|err| ServiceError::Decode(err.to_string()))?;
        Ok(page.results)
    }
}

#[async_trait]
impl CatalogService for TmdbCatalog {
    async fn fetch_popular(&self) -> Result<Vec<MovieSummary>, ServiceError> {
        self.fetch_page("/movie/popular", &[]).await
    }

    async fn search_by_query(&self, query: &str) -> Result<Vec<MovieSummary>, ServiceError> {
        self.fetch_page("/search/movie", &[("query", query)]).await
    }
}
