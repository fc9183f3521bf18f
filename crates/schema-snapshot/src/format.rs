//! File formats for metadata and snapshot documents.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SnapshotError};

/// Serialization format of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Infer the format from a file extension (`.json`, `.yaml`, `.yml`).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(DocumentFormat::Json),
            Some("yaml") | Some("yml") => Ok(DocumentFormat::Yaml),
            _ => Err(SnapshotError::Config(format!(
                "cannot infer document format from {:?}; use a .json, .yaml or .yml extension",
                path
            ))),
        }
    }

    pub fn parse<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        match self {
            DocumentFormat::Json => Ok(serde_json::from_str(text)?),
            DocumentFormat::Yaml => Ok(serde_yaml::from_str(text)?),
        }
    }

    pub fn render<T: Serialize>(&self, value: &T, pretty: bool) -> Result<String> {
        match self {
            DocumentFormat::Json if pretty => Ok(serde_json::to_string_pretty(value)?),
            DocumentFormat::Json => Ok(serde_json::to_string(value)?),
            DocumentFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}
