//! Error types for raywalk

use thiserror::Error;

/// Errors raised while loading or validating configuration and levels.
///
/// The per-frame path never produces these; it degrades instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid level: {0}")]
    InvalidLevel(String),
}
