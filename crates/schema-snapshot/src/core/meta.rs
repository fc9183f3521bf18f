//! Descriptors returned by a metadata provider.
//!
//! These are the provider's view of a node: names, comments and scalar
//! attributes. Cross-node relationships are expressed by name only (a foreign
//! key declares the table path and column names it references), which is what
//! lets the engine rebuild them inside the detached graph.

use serde::{Deserialize, Serialize};

use super::identifier::TablePath;
use super::schema::{Check, DataType, SortOrder, TableOptions};

/// Catalog descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMeta {
    pub name: String,
    #[serde(default)]
    pub comment: String,
}

/// Schema descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaMeta {
    pub name: String,
    #[serde(default)]
    pub comment: String,
}

/// Domain descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainMeta {
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub checks: Vec<Check>,
}

/// Table descriptor (children are enumerated separately).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMeta {
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub options: TableOptions,
}

/// Column descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub comment: String,
}

impl FieldMeta {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            comment: String::new(),
        }
    }
}

/// Index column descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortFieldMeta {
    pub name: String,
    #[serde(default)]
    pub order: SortOrder,
}

/// Index descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMeta {
    pub name: String,
    pub fields: Vec<SortFieldMeta>,
    #[serde(default)]
    pub unique: bool,
}

/// Unique or primary key descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMeta {
    pub name: String,
    pub fields: Vec<String>,
    #[serde(default = "default_true")]
    pub enforced: bool,
}

impl KeyMeta {
    pub fn new<S: Into<String>>(name: impl Into<String>, fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            enforced: true,
        }
    }

    /// Structural equality used to pick the primary key out of the unique keys.
    pub fn same_key(&self, other: &KeyMeta) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

/// The unique key a foreign key declares as its target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyReference {
    /// Table owning the referenced key.
    pub table: TablePath,
    /// Referenced columns in key order.
    pub fields: Vec<String>,
}

/// Foreign key descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyMeta {
    pub name: String,
    pub fields: Vec<String>,
    #[serde(default = "default_true")]
    pub enforced: bool,
    pub references: KeyReference,
}

impl ForeignKeyMeta {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = S>,
        references: TablePath,
        referenced_fields: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            enforced: true,
            references: KeyReference {
                table: references,
                fields: referenced_fields.into_iter().map(Into::into).collect(),
            },
        }
    }
}

/// Sequence descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceMeta {
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub start_with: Option<i64>,
    #[serde(default)]
    pub increment_by: Option<i64>,
    #[serde(default)]
    pub min_value: Option<i64>,
    #[serde(default)]
    pub max_value: Option<i64>,
    #[serde(default)]
    pub cycle: bool,
    #[serde(default)]
    pub cache: Option<i64>,
    /// Whether the descriptor is bound to a live sequence object on the
    /// provider's connection.
    #[serde(default)]
    pub live: bool,
}

/// User-defined type descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UdtMeta {
    pub name: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub synthetic: bool,
    #[serde(default)]
    pub attributes: Vec<FieldMeta>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_is_structural() {
        let a = KeyMeta::new("pk_orders", ["id"]);
        let mut b = KeyMeta::new("pk_orders", ["id"]);
        b.enforced = false;
        assert!(a.same_key(&b));
        assert!(!a.same_key(&KeyMeta::new("pk_orders", ["id", "line"])));
        assert!(!a.same_key(&KeyMeta::new("uk_orders", ["id"])));
    }

    #[test]
    fn test_foreign_key_meta_from_yaml() {
        let yaml = r#"
name: fk_orders_customer
fields: [customer_id]
references:
  table: { schema: public, table: customers }
  fields: [id]
"#;
        let fk: ForeignKeyMeta = serde_yaml::from_str(yaml).unwrap();
        assert!(fk.enforced);
        assert_eq!(fk.references.table, TablePath::new("", "public", "customers"));
        assert_eq!(fk.references.fields, vec!["id".to_string()]);
    }
}
