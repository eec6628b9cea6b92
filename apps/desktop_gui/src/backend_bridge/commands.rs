//! Commands flowing from the UI thread to the backend worker.

#[derive(Debug, Clone)]
pub enum BackendCommand {
    Search { query: String },
}
