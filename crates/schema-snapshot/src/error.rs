//! Error types for the snapshot library.

use thiserror::Error;

/// Exit code for configuration and parse errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for metadata provider failures.
pub const EXIT_SOURCE_ERROR: u8 = 2;
/// Exit code for references that cannot be resolved within the snapshot.
pub const EXIT_REFERENCE_ERROR: u8 = 3;
/// Exit code for snapshot documents that fail validation.
pub const EXIT_INVALID_SNAPSHOT: u8 = 4;
/// Exit code for file system errors.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for detachment and snapshot operations.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The metadata provider failed to enumerate a node
    #[error("Source metadata access failed while {context}: {message}")]
    SourceAccess { context: String, message: String },

    /// A foreign key targets a unique key that does not exist in the copied graph
    #[error(
        "Foreign key {foreign_key} on {table} references ({fields}) on {referenced_table}, \
         but no unique key with these columns exists"
    )]
    UnresolvedReference {
        foreign_key: String,
        table: String,
        referenced_table: String,
        fields: String,
    },

    /// A key, index or foreign key names a column the table does not have
    #[error("{owner} on table {table} references unknown column {field}")]
    UnknownField {
        table: String,
        owner: String,
        field: String,
    },

    /// A loaded snapshot document is structurally inconsistent
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SnapshotError {
    /// Create a SourceAccess error describing what the provider was doing.
    pub fn source_access(context: impl Into<String>, message: impl Into<String>) -> Self {
        SnapshotError::SourceAccess {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an UnknownField error.
    pub fn unknown_field(
        table: impl Into<String>,
        owner: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        SnapshotError::UnknownField {
            table: table.into(),
            owner: owner.into(),
            field: field.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            SnapshotError::Config(_) | SnapshotError::Yaml(_) | SnapshotError::Json(_) => {
                EXIT_CONFIG_ERROR
            }
            SnapshotError::SourceAccess { .. } => EXIT_SOURCE_ERROR,
            SnapshotError::UnresolvedReference { .. } | SnapshotError::UnknownField { .. } => {
                EXIT_REFERENCE_ERROR
            }
            SnapshotError::InvalidSnapshot(_) => EXIT_INVALID_SNAPSHOT,
            SnapshotError::Io(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for snapshot operations.
pub type Result<T> = std::result::Result<T, SnapshotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(SnapshotError::Config("x".into()).exit_code(), EXIT_CONFIG_ERROR);
        assert_eq!(
            SnapshotError::source_access("listing catalogs", "connection reset").exit_code(),
            EXIT_SOURCE_ERROR
        );
        assert_eq!(
            SnapshotError::unknown_field("public.orders", "Index idx", "missing").exit_code(),
            EXIT_REFERENCE_ERROR
        );
        assert_eq!(
            SnapshotError::InvalidSnapshot("bad".into()).exit_code(),
            EXIT_INVALID_SNAPSHOT
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(SnapshotError::from(io).exit_code(), EXIT_IO_ERROR);
    }

    #[test]
    fn test_source_access_message() {
        let err = SnapshotError::source_access("listing tables of public", "timeout");
        assert_eq!(
            err.to_string(),
            "Source metadata access failed while listing tables of public: timeout"
        );
    }

    #[test]
    fn test_format_detailed_includes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "snapshot.json");
        let err = SnapshotError::from(io);
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: IO error: snapshot.json"));
    }
}
