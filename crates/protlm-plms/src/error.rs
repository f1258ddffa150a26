use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtlmError {
    /// Rejected request; the message is safe to show to a client.
    #[error("{0}")]
    InvalidInput(String),
    #[error("model bundle has not been initialized")]
    NotReady,
    #[error("checkpoint not found at {0}: expected config.json and model.safetensors")]
    MissingCheckpoint(PathBuf),
    #[error("invalid model configuration in {path}: {reason}")]
    Config { path: PathBuf, reason: String },
    #[error("invalid label map {path}: {reason}")]
    LabelMap { path: PathBuf, reason: String },
    #[error(transparent)]
    Candle(#[from] candle_core::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProtlmError>;
