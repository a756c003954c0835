//! Error types for cmdpulse
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using PulseError
pub type Result<T> = std::result::Result<T, PulseError>;

/// Unified error type for cmdpulse operations
#[derive(Debug, Error)]
pub enum PulseError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Write to {peer} failed: {source}")]
    Write {
        peer: String,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PulseError {
    /// The underlying I/O error kind, if this error came from the socket
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            PulseError::Io(e) => Some(e.kind()),
            PulseError::Connect { source, .. } | PulseError::Write { source, .. } => {
                Some(source.kind())
            }
            _ => None,
        }
    }
}
