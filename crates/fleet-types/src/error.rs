//! Error types for fleet-tracker

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

/// Failures talking to the remote vehicle API
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Server responded with status {0}")]
    Status(u16),

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Veículo com ID {0} não encontrado")]
    VehicleNotFound(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Repository error: {0}")]
    Repository(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_carries_id() {
        let err = Error::VehicleNotFound("nope".to_string());
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_transport_error_converts() {
        let err: Error = TransportError::Status(503).into();
        assert!(matches!(err, Error::Transport(TransportError::Status(503))));
        assert!(err.to_string().contains("503"));
    }
}
