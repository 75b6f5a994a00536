//! Error types for the Glittr DEX

use thiserror::Error;

/// Core errors that can occur across the workspace
#[derive(Debug, Error)]
pub enum Error {
    #[error("Indexer error: {0}")]
    Client(#[from] ClientError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Indexer connection and query errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Indexer unreachable at {url}")]
    Unreachable { url: String },

    #[error("Indexer returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Transaction {tx_id} not indexed after {attempts} attempts")]
    ConfirmationTimeout { tx_id: String, attempts: u32 },
}

/// Result type alias for DEX operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::from(ClientError::Api {
            status: 404,
            message: "not found".into(),
        });
        assert_eq!(err.to_string(), "Indexer error: Indexer returned 404: not found");

        let err = ClientError::ConfirmationTimeout {
            tx_id: "abc123".into(),
            attempts: 12,
        };
        assert_eq!(
            err.to_string(),
            "Transaction abc123 not indexed after 12 attempts"
        );
    }
}
