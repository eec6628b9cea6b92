use thiserror::Error;

/// Failure raised by the remote catalog collaborator. The fetch controller
/// absorbs every variant the same way; the split exists for diagnostics.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("catalog request failed: {0}")]
    Transport(String),
    #[error("catalog returned status {status}")]
    Status { status: u16 },
    #[error("invalid catalog response payload: {0}")]
    Decode(String),
}
