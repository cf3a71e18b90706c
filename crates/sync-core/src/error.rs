//! Error taxonomy shared by the source, sink, and engine.
//!
//! The read phase (schema probe, source listing, dedup scan) treats every
//! variant as fatal; the write loop catches per-record errors and records
//! them in the run summary instead of propagating.

/// Error type for sync operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Source credential exchange was rejected
    #[error("credential exchange rejected: {reason}")]
    Auth { reason: String },

    /// An HTTP call returned a non-success status
    #[error("{operation} failed: HTTP {status}: {body}")]
    Transport {
        operation: String,
        status: u16,
        body: String,
    },

    /// An HTTP call failed below the protocol level (connect, timeout, decode)
    #[error("{operation} failed: {detail}")]
    Connection { operation: String, detail: String },
}

impl SyncError {
    /// Build a [`SyncError::Transport`] from a response status and body text.
    pub fn transport(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        SyncError::Transport {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    /// Build a [`SyncError::Connection`] from any displayable transport failure.
    pub fn connection(operation: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        SyncError::Connection {
            operation: operation.into(),
            detail: detail.to_string(),
        }
    }
}
