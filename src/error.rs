// ABOUTME: Application-wide error types for talkiepi.
// ABOUTME: Uses thiserror; every variant here is fatal to the bootstrap.

use std::path::PathBuf;
use thiserror::Error;

use crate::identity::IdentityError;
use crate::session::SessionError;
use crate::tls::TlsError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("no server configured (use --server or the config file's \"server\" key)")]
    MissingServer,

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to install signal handlers: {0}")]
    SignalSetup(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
