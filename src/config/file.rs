// ABOUTME: On-disk configuration file format (JSON, or YAML by extension).
// ABOUTME: Missing keys take zero values so a file always overrides every flag.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{ConnectionConfig, non_empty_path};
use crate::error::{Error, Result};

/// Values read from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub server: String,
    pub username: String,
    pub password: String,
    pub insecure: bool,
    pub certificate: String,
    pub channel: String,
}

/// Serialization format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from the file extension. Anything that is not
    /// `.yml`/`.yaml` is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml") => {
                ConfigFormat::Yaml
            }
            _ => ConfigFormat::Json,
        }
    }
}

impl ConfigFile {
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn parse(content: &str, format: ConfigFormat) -> std::result::Result<Self, String> {
        match format {
            ConfigFormat::Json => Self::from_json(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => Self::from_yaml(content).map_err(|e| e.to_string()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, ConfigFormat::from_path(path)).map_err(|reason| Error::ConfigParse {
            path: path.to_path_buf(),
            reason,
        })
    }
}

impl From<ConfigFile> for ConnectionConfig {
    fn from(file: ConfigFile) -> Self {
        ConnectionConfig {
            server: file.server,
            username: file.username,
            password: file.password,
            channel_name: file.channel,
            insecure_skip_verify: file.insecure,
            certificate_path: non_empty_path(&file.certificate),
        }
    }
}
