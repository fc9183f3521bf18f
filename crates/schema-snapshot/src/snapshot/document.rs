//! Versioned on-disk envelope for a snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::{Snapshot, SnapshotStats};
use crate::error::{Result, SnapshotError};
use crate::format::DocumentFormat;

/// Incremented when the serialized snapshot layout changes.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// A snapshot with the information needed to trust it when read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDocument {
    /// Layout version of `snapshot`.
    pub format_version: u32,

    /// When the snapshot was detached.
    pub created_at: DateTime<Utc>,

    /// Where the metadata came from (file path or provider name).
    pub source: String,

    /// SHA-256 fingerprint of `snapshot`.
    pub fingerprint: String,

    /// Entity counts, informational.
    pub stats: SnapshotStats,

    /// The snapshot itself.
    pub snapshot: Snapshot,
}

impl SnapshotDocument {
    /// Wrap a snapshot, computing its fingerprint and stats.
    pub fn new(snapshot: Snapshot, source: impl Into<String>) -> Result<Self> {
        Ok(Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            created_at: Utc::now(),
            source: source.into(),
            fingerprint: snapshot.fingerprint()?,
            stats: snapshot.stats(),
            snapshot,
        })
    }

    /// Parse a document and verify it.
    pub fn parse(text: &str, format: DocumentFormat) -> Result<Self> {
        let document: SnapshotDocument = format.parse(text)?;
        document.verify()?;
        Ok(document)
    }

    /// Load a document, inferring the format from the extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    pub fn render(&self, format: DocumentFormat, pretty: bool) -> Result<String> {
        format.render(self, pretty)
    }

    /// Write the document to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P, format: DocumentFormat, pretty: bool) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.render(format, pretty)?)?;
        info!("Wrote snapshot {} to {:?}", self.fingerprint, path);
        Ok(())
    }

    /// Check version, structure, fingerprint and stats.
    pub fn verify(&self) -> Result<()> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::InvalidSnapshot(format!(
                "unsupported format version {} (expected {})",
                self.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }

        self.snapshot.validate()?;

        let actual = self.snapshot.fingerprint()?;
        if actual != self.fingerprint {
            return Err(SnapshotError::InvalidSnapshot(format!(
                "fingerprint mismatch: document says {}, content hashes to {}",
                self.fingerprint, actual
            )));
        }

        if self.snapshot.stats() != self.stats {
            return Err(SnapshotError::InvalidSnapshot(
                "stats do not match the snapshot content".into(),
            ));
        }

        Ok(())
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataType, FieldMeta, KeyMeta};
    use crate::provider::{MetaDocument, TableDef};
    use tempfile::NamedTempFile;

    fn snapshot() -> Snapshot {
        let mut t = TableDef::new("users");
        t.fields = vec![FieldMeta::new("id", DataType::new("int").identity())];
        t.unique_keys = vec![KeyMeta::new("pk_users", ["id"])];
        t.primary_key = Some(KeyMeta::new("pk_users", ["id"]));
        Snapshot::detach(MetaDocument::single_schema("public", vec![t])).unwrap()
    }

    fn temp_with_ext(ext: &str) -> NamedTempFile {
        tempfile::Builder::new().suffix(ext).tempfile().unwrap()
    }

    #[test]
    fn test_save_load_json() {
        let doc = SnapshotDocument::new(snapshot(), "test").unwrap();
        let file = temp_with_ext(".json");
        doc.save(file.path(), DocumentFormat::Json, true).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(
            serde_json::from_str::<serde_json::Value>(&content).is_ok(),
            "Snapshot file should be valid JSON"
        );

        let loaded = SnapshotDocument::load(file.path()).unwrap();
        assert_eq!(loaded.fingerprint, doc.fingerprint);
        assert_eq!(loaded.source, "test");
        assert_eq!(loaded.stats.tables, 1);
        assert_eq!(loaded.into_snapshot(), doc.snapshot);
    }

    #[test]
    fn test_save_load_yaml() {
        let doc = SnapshotDocument::new(snapshot(), "test").unwrap();
        let file = temp_with_ext(".yaml");
        doc.save(file.path(), DocumentFormat::Yaml, true).unwrap();

        let loaded = SnapshotDocument::load(file.path()).unwrap();
        assert_eq!(loaded.snapshot, doc.snapshot);
    }

    #[test]
    fn test_tampered_fingerprint_rejected() {
        let mut doc = SnapshotDocument::new(snapshot(), "test").unwrap();
        doc.fingerprint = "0".repeat(64);
        let text = doc.render(DocumentFormat::Json, false).unwrap();

        let err = SnapshotDocument::parse(&text, DocumentFormat::Json).unwrap_err();
        assert!(err.to_string().contains("fingerprint mismatch"));
    }

    #[test]
    fn test_tampered_stats_rejected() {
        let mut doc = SnapshotDocument::new(snapshot(), "test").unwrap();
        doc.stats.tables = 999;
        let text = doc.render(DocumentFormat::Json, false).unwrap();

        let err = SnapshotDocument::parse(&text, DocumentFormat::Json).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidSnapshot(_)));
        assert!(err.to_string().contains("stats do not match"));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut doc = SnapshotDocument::new(snapshot(), "test").unwrap();
        doc.format_version = 99;
        assert!(matches!(
            doc.verify(),
            Err(SnapshotError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SnapshotDocument::load("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
    }
}
