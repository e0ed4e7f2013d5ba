// ABOUTME: Session-specific error types.
// ABOUTME: Covers address parsing, connection, and TLS handshake failures during init.

use std::time::Duration;
use thiserror::Error;

use crate::tls::TlsError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid server address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("connecting to {address} timed out after {timeout:?}")]
    ConnectTimeout { address: String, timeout: Duration },

    #[error("TLS handshake with {address} failed: {source}")]
    Handshake {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("session initialization failed: {0}")]
    Init(String),
}
