use std::sync::Arc;

use async_trait::async_trait;
use shared::{domain::MovieSummary, error::ServiceError};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

pub mod config;
pub mod tmdb;

/// User-facing message for a failed initial popular-titles load.
pub const INITIAL_LOAD_ERROR: &str = "failed to fetch data";
/// User-facing message for a failed search.
pub const SEARCH_ERROR: &str = "Failed to search movies...";

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Remote catalog collaborator consumed by the fetch controller. The query
/// passed to `search_by_query` has already been trimmed.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn fetch_popular(&self) -> Result<Vec<MovieSummary>, ServiceError>;
    async fn search_by_query(&self, query: &str) -> Result<Vec<MovieSummary>, ServiceError>;
}

/// The single piece of mutable presentation state. Owned by the controller;
/// consumers only ever see cloned snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    pub items: Vec<MovieSummary>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    InitialLoad,
    Search,
}

impl FetchKind {
    fn failure_message(self) -> &'static str {
        match self {
            FetchKind::InitialLoad => INITIAL_LOAD_ERROR,
            FetchKind::Search => SEARCH_ERROR,
        }
    }
}

struct ControllerState {
    view: ViewModel,
    latest_token: u64,
}

/// Sequences asynchronous catalog fetches against the ViewModel.
///
/// Two triggers exist: the one-time initial popular-titles load and
/// user-submitted searches. Each issued fetch captures a monotonically
/// increasing request token; a completion is applied only while its token is
/// still the latest issued, so a slow response can never overwrite the state
/// written by a newer one. Searches are additionally refused while a fetch is
/// in flight.
pub struct FetchController {
    catalog: Arc<dyn CatalogService>,
    inner: Mutex<ControllerState>,
    changes: broadcast::Sender<ViewModel>,
}

impl FetchController {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            catalog,
            inner: Mutex::new(ControllerState {
                view: ViewModel::default(),
                latest_token: 0,
            }),
            changes,
        }
    }

    /// Receives a ViewModel snapshot after every state mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<ViewModel> {
        self.changes.subscribe()
    }

    pub async fn snapshot(&self) -> ViewModel {
        self.inner.lock().await.view.clone()
    }

    /// Loads the popular-titles list. Expected to be called once, when the
    /// presentation session starts.
    pub async fn load_initial(&self) {
        let token = self.begin_fetch().await;
        let result = self.catalog.fetch_popular().await;
        self.apply_completion(token, FetchKind::InitialLoad, result)
            .await;
    }

    /// Runs a catalog search for `query`. A query that is empty after
    /// trimming, or a call made while another fetch is still in flight, is a
    /// no-op: no request is issued and no state changes.
    pub async fn search(&self, query: &str) {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return;
        }
        let Some(token) = self.try_begin_search().await else {
            debug!(query = trimmed, "search ignored while a fetch is in flight");
            return;
        };
        let result = self.catalog.search_by_query(trimmed).await;
        self.apply_completion(token, FetchKind::Search, result).await;
    }

    /// Marks a new fetch as issued: bumps the token and raises the loading
    /// flag before the remote call is made.
    async fn begin_fetch(&self) -> u64 {
        let mut guard = self.inner.lock().await;
        guard.latest_token += 1;
        guard.view.is_loading = true;
        let _ = self.changes.send(guard.view.clone());
        guard.latest_token
    }

    async fn try_begin_search(&self) -> Option<u64> {
        let mut guard = self.inner.lock().await;
        if guard.view.is_loading {
            return None;
        }
        guard.latest_token += 1;
        guard.view.is_loading = true;
        let _ = self.changes.send(guard.view.clone());
        Some(guard.latest_token)
    }

    /// Applies a fetch outcome to the ViewModel, unless a newer fetch has been
    /// issued since `token` was captured. A stale completion must not touch
    /// anything, including `is_loading`: the newer request owns that flag.
    async fn apply_completion(
        &self,
        token: u64,
        kind: FetchKind,
        result: Result<Vec<MovieSummary>, ServiceError>,
    ) {
        let mut guard = self.inner.lock().await;
        if token != guard.latest_token {
            debug!(
                token,
                latest_token = guard.latest_token,
                "discarding superseded fetch completion"
            );
            return;
        }
        match result {
            Ok(items) => {
                guard.view.items = items;
                guard.view.error_message = None;
            }
            Err(err) => {
                warn!(kind = ?kind, "catalog fetch failed: {err}");
                guard.view.error_message = Some(kind.failure_message().to_string());
            }
        }
        guard.view.is_loading = false;
        let _ = self.changes.send(guard.view.clone());
    }
}

#[cfg(test)]
mod tests;
