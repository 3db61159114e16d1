//! Chat client error types

use thiserror::Error;

/// Chat client error type
#[derive(Debug, Error)]
pub enum ChatError {
    /// Connection establishment or channel failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame could not be decoded into a known protocol event
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// Payload serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Acknowledged request did not complete before its deadline
    #[error("Request timed out")]
    Timeout,

    /// Server acknowledged the request with an error
    #[error("Server error: {0}")]
    Server(String),

    /// Operation requires an initialized connection
    #[error("Not connected")]
    NotConnected,
}
