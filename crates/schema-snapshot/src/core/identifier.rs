//! Identifiers used to address entities inside a snapshot.
//!
//! Two kinds of identifiers exist:
//!
//! - **Paths** ([`SchemaPath`], [`TablePath`]) name an entity by its position in
//!   the catalog/schema/table hierarchy. They are how providers address nodes and
//!   how keys are matched structurally across two different graphs.
//! - **Ids** ([`CatalogId`], [`SchemaId`], [`TableId`], [`KeyId`]) are positional
//!   indexes into one snapshot's arena. They are only meaningful for the snapshot
//!   that produced them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualified name of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaPath {
    /// Catalog name (may be empty for products without catalogs).
    #[serde(default)]
    pub catalog: String,

    /// Schema name.
    pub schema: String,
}

impl SchemaPath {
    pub fn new(catalog: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
        }
    }

    /// Path of a table inside this schema.
    pub fn table(&self, table: impl Into<String>) -> TablePath {
        TablePath {
            catalog: self.catalog.clone(),
            schema: self.schema.clone(),
            table: table.into(),
        }
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.catalog.is_empty() {
            write!(f, "{}", self.schema)
        } else {
            write!(f, "{}.{}", self.catalog, self.schema)
        }
    }
}

/// Qualified name of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TablePath {
    /// Catalog name (may be empty for products without catalogs).
    #[serde(default)]
    pub catalog: String,

    /// Schema name.
    pub schema: String,

    /// Table name.
    pub table: String,
}

impl TablePath {
    pub fn new(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Path of the schema containing this table.
    pub fn schema_path(&self) -> SchemaPath {
        SchemaPath::new(self.catalog.clone(), self.schema.clone())
    }
}

impl fmt::Display for TablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.catalog.is_empty() {
            write!(f, "{}.{}", self.schema, self.table)
        } else {
            write!(f, "{}.{}.{}", self.catalog, self.schema, self.table)
        }
    }
}

/// Position of a catalog in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatalogId(pub(crate) usize);

impl CatalogId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Position of a schema in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaId {
    pub(crate) catalog: usize,
    pub(crate) schema: usize,
}

impl SchemaId {
    pub fn catalog(&self) -> CatalogId {
        CatalogId(self.catalog)
    }

    pub fn index(&self) -> usize {
        self.schema
    }
}

/// Position of a table in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId {
    pub(crate) catalog: usize,
    pub(crate) schema: usize,
    pub(crate) table: usize,
}

impl TableId {
    pub fn schema(&self) -> SchemaId {
        SchemaId {
            catalog: self.catalog,
            schema: self.schema,
        }
    }

    pub fn index(&self) -> usize {
        self.table
    }
}

/// Position of a unique key in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyId {
    pub(crate) table: TableId,
    pub(crate) key: usize,
}

impl KeyId {
    /// Table owning the key.
    pub fn table(&self) -> TableId {
        self.table
    }

    pub fn index(&self) -> usize {
        self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_path_display() {
        assert_eq!(TablePath::new("", "public", "orders").to_string(), "public.orders");
        assert_eq!(
            TablePath::new("shop", "public", "orders").to_string(),
            "shop.public.orders"
        );
    }

    #[test]
    fn test_schema_path_table() {
        let schema = SchemaPath::new("shop", "sales");
        let table = schema.table("orders");
        assert_eq!(table, TablePath::new("shop", "sales", "orders"));
        assert_eq!(table.schema_path(), schema);
    }

    #[test]
    fn test_path_deserializes_without_catalog() {
        let path: TablePath = serde_json::from_str(r#"{"schema":"public","table":"t"}"#).unwrap();
        assert_eq!(path.catalog, "");
        assert_eq!(path.to_string(), "public.t");
    }

    #[test]
    fn test_ids_expose_parents() {
        let table = TableId {
            catalog: 1,
            schema: 2,
            table: 3,
        };
        let key = KeyId { table, key: 0 };
        assert_eq!(key.table(), table);
        assert_eq!(table.schema().catalog(), CatalogId(1));
        assert_eq!(table.schema().index(), 2);
        assert_eq!(table.index(), 3);
    }
}
