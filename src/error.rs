//! Error types for Habitra Core

use thiserror::Error;

/// Errors that can occur in the habit engine.
///
/// The store operations themselves never fail: an unknown habit id or an
/// out-of-range reorder index degrades to a no-op. These variants cover the
/// edges where the engine meets untrusted input or the device filesystem.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unsupported store version: {0}")]
    UnsupportedVersion(u32),
}
