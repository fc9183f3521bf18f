//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::format::DocumentFormat;
use crate::provider::MetaFilter;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Metadata document to detach.
    pub source: SourceConfig,

    /// Where and how the snapshot document is written.
    #[serde(default)]
    pub output: OutputConfig,

    /// Catalogs, schemas and tables to keep.
    #[serde(default)]
    pub filter: MetaFilter,
}

impl Config {
    /// A configuration reading `path` with every other setting defaulted.
    pub fn for_source(path: impl Into<PathBuf>) -> Self {
        Self {
            source: SourceConfig {
                path: path.into(),
                format: None,
            },
            output: OutputConfig::default(),
            filter: MetaFilter::default(),
        }
    }
}

/// Source metadata document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path of the metadata document.
    pub path: PathBuf,

    /// Document format. Inferred from the extension if not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DocumentFormat>,
}

impl SourceConfig {
    /// Format to read the source with.
    pub fn resolved_format(&self) -> Result<DocumentFormat> {
        match self.format {
            Some(format) => Ok(format),
            None => DocumentFormat::from_path(&self.path),
        }
    }
}

/// Snapshot output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output file. The snapshot is written to stdout if not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Output format. Inferred from the output extension if not set,
    /// JSON for stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DocumentFormat>,

    /// Pretty-print JSON output (default: true).
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            format: None,
            pretty: true,
        }
    }
}

impl OutputConfig {
    /// Format to write the snapshot with.
    pub fn resolved_format(&self) -> Result<DocumentFormat> {
        match (self.format, self.path.as_deref()) {
            (Some(format), _) => Ok(format),
            (None, Some(path)) => DocumentFormat::from_path(path),
            (None, None) => Ok(DocumentFormat::Json),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn default_true() -> bool {
    true
}
