//! Error types for AshvaCtrl

use thiserror::Error;

/// AshvaCtrl error type
#[derive(Error, Debug)]
pub enum AshvaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<toml::de::Error> for AshvaError {
    fn from(e: toml::de::Error) -> Self {
        AshvaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AshvaError>;
