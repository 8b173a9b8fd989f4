//! Error types for wave set construction.

use thiserror::Error;

/// Errors raised while building a wave set.
///
/// Evaluation never fails; everything here surfaces at construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaveError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl WaveError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, WaveError>;
