use thiserror::Error;

/// Custom error types for tripfield
#[derive(Debug, Error)]
pub enum TripfieldError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
