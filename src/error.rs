// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Result type used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The forecast table has not been produced yet.
    #[error("missing forecast table at '{}'. Run the forecasting step (predict) first", path.display())]
    MissingForecast { path: PathBuf },

    #[error("forecast table at '{}' has no rows", path.display())]
    EmptyForecast { path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("usage: {0}")]
    Usage(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }
}
