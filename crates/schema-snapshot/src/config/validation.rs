//! Configuration validation.

use super::Config;
use crate::error::{Result, SnapshotError};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    // Source validation
    if config.source.path.as_os_str().is_empty() {
        return Err(SnapshotError::Config("source.path is required".into()));
    }
    if config.source.format.is_none() {
        config.source.resolved_format().map_err(|_| {
            SnapshotError::Config(format!(
                "source.format is required when {:?} has no .json, .yaml or .yml extension",
                config.source.path
            ))
        })?;
    }

    // Output validation
    if let Some(path) = config.output.path() {
        if path.as_os_str().is_empty() {
            return Err(SnapshotError::Config(
                "output.path must not be empty; omit it to write to stdout".into(),
            ));
        }
        if config.output.format.is_none() {
            config.output.resolved_format().map_err(|_| {
                SnapshotError::Config(format!(
                    "output.format is required when {:?} has no .json, .yaml or .yml extension",
                    path
                ))
            })?;
        }
    }

    // Filter validation
    let filter = &config.filter;
    for (section, entries) in [
        ("filter.catalogs", &filter.catalogs),
        ("filter.schemas", &filter.schemas),
        ("filter.tables", &filter.tables),
        ("filter.exclude_tables", &filter.exclude_tables),
    ] {
        if entries.iter().any(|e| e.trim().is_empty()) {
            return Err(SnapshotError::Config(format!(
                "{} must not contain empty entries",
                section
            )));
        }
    }
    for pattern in filter.tables.iter().chain(&filter.exclude_tables) {
        if pattern.split('.').count() > 2 || pattern.split('.').any(str::is_empty) {
            return Err(SnapshotError::Config(format!(
                "table filter '{}' must be 'table' or 'schema.table'",
                pattern
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputConfig, SourceConfig};
    use crate::format::DocumentFormat;
    use crate::provider::MetaFilter;
    use std::path::PathBuf;

    fn valid_config() -> Config {
        Config {
            source: SourceConfig {
                path: PathBuf::from("meta/shop.yaml"),
                format: None,
            },
            output: OutputConfig {
                path: Some(PathBuf::from("out/shop.snapshot.json")),
                format: None,
                pretty: true,
            },
            filter: MetaFilter {
                schemas: vec!["sales".to_string()],
                tables: vec!["orders".to_string(), "crm.customers".to_string()],
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_valid_config() {
        let config = valid_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_missing_source_path() {
        let mut config = valid_config();
        config.source.path = PathBuf::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_source_without_extension_needs_format() {
        let mut config = valid_config();
        config.source.path = PathBuf::from("meta/shop");
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("source.format is required"));

        config.source.format = Some(DocumentFormat::Yaml);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_output_without_extension_needs_format() {
        let mut config = valid_config();
        config.output.path = Some(PathBuf::from("out/snapshot"));
        assert!(validate(&config).is_err());

        config.output.format = Some(DocumentFormat::Json);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_stdout_output_is_valid() {
        let mut config = valid_config();
        config.output.path = None;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_filter_entry() {
        let mut config = valid_config();
        config.filter.catalogs = vec!["  ".to_string()];
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("filter.catalogs"));
    }

    #[test]
    fn test_malformed_table_pattern() {
        let mut config = valid_config();
        config.filter.exclude_tables = vec!["db.sales.orders".to_string()];
        assert!(validate(&config).is_err());

        config.filter.exclude_tables = vec!["sales.".to_string()];
        assert!(validate(&config).is_err());
    }
}
