//! Error types
//!
//! Only conditions the caller must act on are errors. Dead sensors, missing
//! half-windows and out-of-domain samples are recovered inside the pipeline
//! and reported through reason codes instead.

use thiserror::Error;

/// Analysis could not start
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Session has no samples ("no data" signal)
    #[error("session is empty: no samples to analyse")]
    EmptySession,
}

/// Configuration could not be loaded or is inconsistent
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Session or result storage failed
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}
