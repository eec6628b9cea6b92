//! Backend-to-UI events and startup failure presentation.

use client_core::ViewModel;

pub enum UiEvent {
    BackendReady,
    ViewModelChanged(ViewModel),
    BackendFailed(String),
}

/// Turns a raw backend startup failure into a message with actionable wording.
pub fn describe_startup_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("invalid catalog base url") {
        format!("Catalog base URL is misconfigured; fix reelgrid.toml or TMDB_BASE_URL and restart. ({message})")
    } else if lower.contains("failed to build backend runtime") {
        format!("Backend worker could not start; verify the local environment and restart. ({message})")
    } else {
        format!("Backend startup failed: {message}")
    }
}
