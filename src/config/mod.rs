// ABOUTME: Connection configuration and its resolution from flags and a config file.
// ABOUTME: A config file, when given, replaces every flag value wholesale.

mod file;

pub use file::{ConfigFile, ConfigFormat};

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// The fully resolved parameters needed to start a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Remote voice server, `host[:port]`.
    pub server: String,
    /// Client identity. Empty until an identity is generated.
    pub username: String,
    pub password: String,
    /// Channel to join on connect. Empty means the server default.
    pub channel_name: String,
    /// Skip verification of the server certificate.
    ///
    /// Defaults to `true` for compatibility with existing deployments. This
    /// trusts any server that answers on the configured address.
    pub insecure_skip_verify: bool,
    /// Combined PEM file holding the client certificate chain and private key.
    pub certificate_path: Option<PathBuf>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            username: String::new(),
            password: String::new(),
            channel_name: String::new(),
            insecure_skip_verify: true,
            certificate_path: None,
        }
    }
}

impl ConnectionConfig {
    /// Check the invariants that must hold before a session is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.server.trim().is_empty() {
            return Err(Error::MissingServer);
        }
        Ok(())
    }
}

/// Merge flag values with an optional config file.
///
/// Without a path the flags are returned untouched. With a path, every field
/// comes from the file, including fields the file leaves out (they take their
/// zero value). A file that cannot be read or parsed is an error.
pub fn resolve(flags: ConnectionConfig, config_path: Option<&Path>) -> Result<ConnectionConfig> {
    let Some(path) = config_path else {
        return Ok(flags);
    };

    let file = ConfigFile::load(path)?;
    tracing::debug!(path = %path.display(), "configuration taken from file");

    Ok(file.into())
}

/// Map the "empty means unset" convention onto an optional path.
pub(crate) fn non_empty_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
