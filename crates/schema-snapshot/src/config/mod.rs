//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML file without validating it, so overrides can be applied
    /// first. Call [`Config::validate`] afterwards.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DocumentFormat;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config = Config::from_yaml("source:\n  path: meta/shop.yaml\n").unwrap();
        assert_eq!(config.source.path, PathBuf::from("meta/shop.yaml"));
        assert_eq!(config.source.resolved_format().unwrap(), DocumentFormat::Yaml);
        assert!(config.output.path.is_none());
        assert!(config.output.pretty);
        assert_eq!(config.output.resolved_format().unwrap(), DocumentFormat::Json);
        assert!(config.filter.is_empty());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
source:
  path: exports/meta
  format: json
output:
  path: out/snapshot.yml
  pretty: false
filter:
  schemas: [sales, crm]
  exclude_tables: [sales.audit_log]
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.source.resolved_format().unwrap(), DocumentFormat::Json);
        assert_eq!(config.output.resolved_format().unwrap(), DocumentFormat::Yaml);
        assert!(!config.output.pretty);
        assert_eq!(config.filter.schemas, vec!["sales", "crm"]);
        assert_eq!(config.filter.exclude_tables, vec!["sales.audit_log"]);
    }

    #[test]
    fn test_missing_source_is_error() {
        assert!(Config::from_yaml("output:\n  pretty: true\n").is_err());
    }

    #[test]
    fn test_read_defers_validation() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "source:\n  path: exports/meta").unwrap();

        assert!(Config::load(file.path()).is_err());

        let mut config = Config::read(file.path()).unwrap();
        assert!(config.validate().is_err());
        config.source.path = PathBuf::from("exports/meta.yaml");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "source:\n  path: meta.json").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.source.path, PathBuf::from("meta.json"));
    }
}
