//! Error handling for fiitrack
//!
//! Defines the typed error categories used at the I/O and input-validation
//! boundaries, with anyhow for context chaining and propagation. Engine
//! computations (portfolio metrics, projection) are total over their numeric
//! inputs and never return errors.

use thiserror::Error;

/// Core error types for dashboard operations
#[derive(Error, Debug)]
pub enum FiitrackError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("store error: {0}")]
    Store(String),
}

/// Result type alias for dashboard operations
pub type Result<T> = anyhow::Result<T>;
