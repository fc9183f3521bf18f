//! Owned metadata document that acts as a provider.
//!
//! A `MetaDocument` is the full catalog/schema/table tree written out as plain
//! data, typically loaded from YAML or JSON. It is how exported or hand-written
//! schemas enter the engine, and what async providers are prefetched into.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::{
    CatalogMeta, Check, DomainMeta, FieldMeta, ForeignKeyMeta, IndexMeta, KeyMeta, MetaProvider,
    SchemaMeta, SchemaPath, SequenceMeta, TableMeta, TableOptions, TablePath, UdtMeta,
};
use crate::error::{Result, SnapshotError};
use crate::format::DocumentFormat;

/// Root of a metadata document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetaDocument {
    #[serde(default)]
    pub catalogs: Vec<CatalogDef>,
}

/// Catalog entry of a metadata document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogDef {
    /// Catalog name; empty for products without catalogs.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub schemas: Vec<SchemaDef>,
}

/// Schema entry of a metadata document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaDef {
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub domains: Vec<DomainMeta>,
    #[serde(default)]
    pub tables: Vec<TableDef>,
    #[serde(default)]
    pub sequences: Vec<SequenceMeta>,
    #[serde(default)]
    pub udts: Vec<UdtMeta>,
}

impl SchemaDef {
    pub fn new(name: impl Into<String>, tables: Vec<TableDef>) -> Self {
        Self {
            name: name.into(),
            tables,
            ..Default::default()
        }
    }
}

/// Table entry of a metadata document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub options: TableOptions,
    #[serde(default)]
    pub fields: Vec<FieldMeta>,
    #[serde(default)]
    pub indexes: Vec<IndexMeta>,
    /// Unique keys, including the primary key.
    #[serde(default)]
    pub unique_keys: Vec<KeyMeta>,
    #[serde(default)]
    pub primary_key: Option<KeyMeta>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyMeta>,
    #[serde(default)]
    pub checks: Vec<Check>,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl MetaDocument {
    /// A document with one unnamed catalog holding `schemas`.
    pub fn with_schemas(schemas: Vec<SchemaDef>) -> Self {
        Self {
            catalogs: vec![CatalogDef {
                schemas,
                ..Default::default()
            }],
        }
    }

    /// A document with one unnamed catalog and one schema.
    pub fn single_schema(schema: impl Into<String>, tables: Vec<TableDef>) -> Self {
        Self::with_schemas(vec![SchemaDef::new(schema, tables)])
    }

    /// Parse a document.
    pub fn parse(text: &str, format: DocumentFormat) -> Result<Self> {
        format.parse(text)
    }

    /// Load a document, inferring the format from the extension unless given.
    pub fn load<P: AsRef<Path>>(path: P, format: Option<DocumentFormat>) -> Result<Self> {
        let path = path.as_ref();
        let format = match format {
            Some(f) => f,
            None => DocumentFormat::from_path(path)?,
        };
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    fn catalog(&self, name: &str) -> Result<&CatalogDef> {
        self.catalogs.iter().find(|c| c.name == name).ok_or_else(|| {
            SnapshotError::source_access(
                format!("reading catalog {:?}", name),
                "catalog not found in document",
            )
        })
    }

    fn schema(&self, path: &SchemaPath) -> Result<&SchemaDef> {
        self.catalog(&path.catalog)?
            .schemas
            .iter()
            .find(|s| s.name == path.schema)
            .ok_or_else(|| {
                SnapshotError::source_access(
                    format!("reading schema {}", path),
                    "schema not found in document",
                )
            })
    }

    fn table(&self, path: &TablePath) -> Result<&TableDef> {
        self.schema(&path.schema_path())?
            .tables
            .iter()
            .find(|t| t.name == path.table)
            .ok_or_else(|| {
                SnapshotError::source_access(
                    format!("reading table {}", path),
                    "table not found in document",
                )
            })
    }
}

impl MetaProvider for MetaDocument {
    fn catalogs(&self) -> Result<Vec<CatalogMeta>> {
        Ok(self
            .catalogs
            .iter()
            .map(|c| CatalogMeta {
                name: c.name.clone(),
                comment: c.comment.clone(),
            })
            .collect())
    }

    fn schemas(&self, catalog: &str) -> Result<Vec<SchemaMeta>> {
        Ok(self
            .catalog(catalog)?
            .schemas
            .iter()
            .map(|s| SchemaMeta {
                name: s.name.clone(),
                comment: s.comment.clone(),
            })
            .collect())
    }

    fn domains(&self, schema: &SchemaPath) -> Result<Vec<DomainMeta>> {
        Ok(self.schema(schema)?.domains.clone())
    }

    fn tables(&self, schema: &SchemaPath) -> Result<Vec<TableMeta>> {
        Ok(self
            .schema(schema)?
            .tables
            .iter()
            .map(|t| TableMeta {
                name: t.name.clone(),
                comment: t.comment.clone(),
                options: t.options.clone(),
            })
            .collect())
    }

    fn sequences(&self, schema: &SchemaPath) -> Result<Vec<SequenceMeta>> {
        Ok(self.schema(schema)?.sequences.clone())
    }

    fn udts(&self, schema: &SchemaPath) -> Result<Vec<UdtMeta>> {
        Ok(self.schema(schema)?.udts.clone())
    }

    fn fields(&self, table: &TablePath) -> Result<Vec<FieldMeta>> {
        Ok(self.table(table)?.fields.clone())
    }

    fn indexes(&self, table: &TablePath) -> Result<Vec<IndexMeta>> {
        Ok(self.table(table)?.indexes.clone())
    }

    fn unique_keys(&self, table: &TablePath) -> Result<Vec<KeyMeta>> {
        Ok(self.table(table)?.unique_keys.clone())
    }

    fn primary_key(&self, table: &TablePath) -> Result<Option<KeyMeta>> {
        Ok(self.table(table)?.primary_key.clone())
    }

    fn foreign_keys(&self, table: &TablePath) -> Result<Vec<ForeignKeyMeta>> {
        Ok(self.table(table)?.foreign_keys.clone())
    }

    fn checks(&self, table: &TablePath) -> Result<Vec<Check>> {
        Ok(self.table(table)?.checks.clone())
    }

    fn provider_name(&self) -> &str {
        "metadata document"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SortOrder, TableKind};
    use crate::Snapshot;

    const SHOP_YAML: &str = r#"
catalogs:
  - name: shop
    schemas:
      - name: sales
        comment: Order processing
        tables:
          - name: orders
            fields:
              - { name: id, data_type: { name: bigint, identity: true } }
              - { name: customer_id, data_type: { name: bigint, nullable: false } }
            indexes:
              - name: ix_orders_customer
                fields: [{ name: customer_id, order: desc }]
            unique_keys:
              - { name: pk_orders, fields: [id] }
            primary_key: { name: pk_orders, fields: [id] }
            foreign_keys:
              - name: fk_orders_customer
                fields: [customer_id]
                references:
                  table: { catalog: shop, schema: crm, table: customers }
                  fields: [id]
          - name: open_orders
            options: { kind: view, source: "select * from orders" }
            fields:
              - { name: id, data_type: { name: bigint } }
      - name: crm
        tables:
          - name: customers
            fields:
              - { name: id, data_type: { name: bigint, nullable: false } }
            unique_keys:
              - { name: pk_customers, fields: [id] }
            primary_key: { name: pk_customers, fields: [id] }
"#;

    #[test]
    fn test_parse_yaml_and_detach() {
        let doc = MetaDocument::parse(SHOP_YAML, DocumentFormat::Yaml).unwrap();
        let snapshot = Snapshot::detach(&doc).unwrap();

        let orders = snapshot
            .find_table(&TablePath::new("shop", "sales", "orders"))
            .unwrap();
        assert_eq!(orders.identity_field().unwrap().name(), "id");
        assert_eq!(orders.indexes()[0].fields()[0].order(), SortOrder::Desc);

        let target = snapshot.referenced_table(&orders.foreign_keys()[0]).unwrap();
        assert_eq!(target.path(), &TablePath::new("shop", "crm", "customers"));

        let view = snapshot
            .find_table(&TablePath::new("shop", "sales", "open_orders"))
            .unwrap();
        assert_eq!(view.options().kind, TableKind::View);
        assert_eq!(
            snapshot.catalogs()[0].schemas()[0].comment(),
            "Order processing"
        );
    }

    #[test]
    fn test_missing_nodes_are_source_errors() {
        let doc = MetaDocument::parse(SHOP_YAML, DocumentFormat::Yaml).unwrap();
        assert!(matches!(
            doc.schemas("nope"),
            Err(SnapshotError::SourceAccess { .. })
        ));
        assert!(doc.tables(&SchemaPath::new("shop", "hr")).is_err());
        assert!(doc
            .fields(&TablePath::new("shop", "sales", "invoices"))
            .is_err());
    }

    #[test]
    fn test_load_with_explicit_format() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, SHOP_YAML.as_bytes()).unwrap();

        // No extension: the format must be given.
        assert!(MetaDocument::load(file.path(), None).is_err());
        let doc = MetaDocument::load(file.path(), Some(DocumentFormat::Yaml)).unwrap();
        assert_eq!(doc.catalogs[0].schemas.len(), 2);
    }
}
