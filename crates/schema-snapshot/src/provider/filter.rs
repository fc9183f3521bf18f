//! Include/exclude filtering in front of another provider.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    CatalogMeta, Check, DomainMeta, FieldMeta, ForeignKeyMeta, IndexMeta, KeyMeta, MetaProvider,
    SchemaMeta, SchemaPath, SequenceMeta, TableMeta, TablePath, UdtMeta,
};
use crate::error::Result;

/// Which catalogs, schemas and tables survive filtering.
///
/// Empty include lists mean "everything". Table entries are either a bare
/// table name or `schema.table`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFilter {
    #[serde(default)]
    pub catalogs: Vec<String>,

    #[serde(default)]
    pub schemas: Vec<String>,

    #[serde(default)]
    pub tables: Vec<String>,

    #[serde(default)]
    pub exclude_tables: Vec<String>,
}

impl MetaFilter {
    /// True when the filter lets everything through.
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
            && self.schemas.is_empty()
            && self.tables.is_empty()
            && self.exclude_tables.is_empty()
    }

    pub fn includes_catalog(&self, catalog: &str) -> bool {
        self.catalogs.is_empty() || self.catalogs.iter().any(|c| c == catalog)
    }

    pub fn includes_schema(&self, path: &SchemaPath) -> bool {
        self.includes_catalog(&path.catalog)
            && (self.schemas.is_empty() || self.schemas.iter().any(|s| *s == path.schema))
    }

    pub fn includes_table(&self, path: &TablePath) -> bool {
        self.includes_schema(&path.schema_path())
            && (self.tables.is_empty() || self.tables.iter().any(|p| matches_table(p, path)))
            && !self.exclude_tables.iter().any(|p| matches_table(p, path))
    }
}

fn matches_table(pattern: &str, path: &TablePath) -> bool {
    match pattern.split_once('.') {
        Some((schema, table)) => schema == path.schema && table == path.table,
        None => pattern == path.table,
    }
}

/// A provider that hides everything a [`MetaFilter`] excludes.
///
/// Foreign keys whose referenced table is filtered out are dropped too, since
/// their target would never be part of the snapshot.
#[derive(Debug, Clone)]
pub struct FilteredProvider<P> {
    inner: P,
    filter: MetaFilter,
}

impl<P: MetaProvider> FilteredProvider<P> {
    pub fn new(inner: P, filter: MetaFilter) -> Self {
        Self { inner, filter }
    }

    pub fn filter(&self) -> &MetaFilter {
        &self.filter
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: MetaProvider> MetaProvider for FilteredProvider<P> {
    fn catalogs(&self) -> Result<Vec<CatalogMeta>> {
        let mut catalogs = self.inner.catalogs()?;
        catalogs.retain(|c| self.filter.includes_catalog(&c.name));
        Ok(catalogs)
    }

    fn schemas(&self, catalog: &str) -> Result<Vec<SchemaMeta>> {
        let mut schemas = self.inner.schemas(catalog)?;
        schemas.retain(|s| {
            self.filter
                .includes_schema(&SchemaPath::new(catalog, s.name.clone()))
        });
        Ok(schemas)
    }

    fn domains(&self, schema: &SchemaPath) -> Result<Vec<DomainMeta>> {
        self.inner.domains(schema)
    }

    fn tables(&self, schema: &SchemaPath) -> Result<Vec<TableMeta>> {
        let mut tables = self.inner.tables(schema)?;
        tables.retain(|t| {
            let keep = self.filter.includes_table(&schema.table(t.name.clone()));
            if !keep {
                debug!("Filtered out table {}.{}", schema, t.name);
            }
            keep
        });
        Ok(tables)
    }

    fn sequences(&self, schema: &SchemaPath) -> Result<Vec<SequenceMeta>> {
        self.inner.sequences(schema)
    }

    fn udts(&self, schema: &SchemaPath) -> Result<Vec<UdtMeta>> {
        self.inner.udts(schema)
    }

    fn fields(&self, table: &TablePath) -> Result<Vec<FieldMeta>> {
        self.inner.fields(table)
    }

    fn indexes(&self, table: &TablePath) -> Result<Vec<IndexMeta>> {
        self.inner.indexes(table)
    }

    fn unique_keys(&self, table: &TablePath) -> Result<Vec<KeyMeta>> {
        self.inner.unique_keys(table)
    }

    fn primary_key(&self, table: &TablePath) -> Result<Option<KeyMeta>> {
        self.inner.primary_key(table)
    }

    fn foreign_keys(&self, table: &TablePath) -> Result<Vec<ForeignKeyMeta>> {
        let mut foreign_keys = self.inner.foreign_keys(table)?;
        foreign_keys.retain(|fk| {
            let keep = self.filter.includes_table(&fk.references.table);
            if !keep {
                debug!(
                    "Dropping foreign key {} on {}: {} is filtered out",
                    fk.name, table, fk.references.table
                );
            }
            keep
        });
        Ok(foreign_keys)
    }

    fn checks(&self, table: &TablePath) -> Result<Vec<Check>> {
        self.inner.checks(table)
    }

    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;
    use crate::provider::{MetaDocument, SchemaDef, TableDef};
    use crate::Snapshot;

    fn table(name: &str, references: Option<(&str, &str)>) -> TableDef {
        let mut t = TableDef::new(name);
        t.fields = vec![
            FieldMeta::new("id", DataType::new("int").not_null()),
            FieldMeta::new("ref_id", DataType::new("int")),
        ];
        t.unique_keys = vec![KeyMeta::new(format!("pk_{}", name), ["id"])];
        t.primary_key = Some(KeyMeta::new(format!("pk_{}", name), ["id"]));
        if let Some((schema, target)) = references {
            t.foreign_keys = vec![ForeignKeyMeta::new(
                format!("fk_{}_{}", name, target),
                ["ref_id"],
                TablePath::new("", schema, target),
                ["id"],
            )];
        }
        t
    }

    fn document() -> MetaDocument {
        MetaDocument::with_schemas(vec![
            SchemaDef::new(
                "app",
                vec![
                    table("users", None),
                    table("orders", Some(("app", "users"))),
                    table("audit_log", Some(("app", "orders"))),
                ],
            ),
            SchemaDef::new("staging", vec![table("users", Some(("app", "users")))]),
        ])
    }

    fn table_names(snapshot: &Snapshot) -> Vec<String> {
        snapshot.tables().map(|t| t.path().to_string()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = MetaFilter::default();
        assert!(filter.is_empty());
        let snapshot = Snapshot::detach(FilteredProvider::new(document(), filter)).unwrap();
        assert_eq!(snapshot.stats().tables, 4);
    }

    #[test]
    fn test_wrapper_accessors() {
        let filter = MetaFilter {
            tables: vec!["users".into()],
            ..Default::default()
        };
        let provider = FilteredProvider::new(document(), filter.clone());
        assert_eq!(provider.filter(), &filter);
        assert_eq!(provider.provider_name(), "metadata document");
        assert_eq!(provider.tables(&SchemaPath::new("", "app")).unwrap().len(), 1);

        // The wrapped provider is returned unfiltered.
        let inner = provider.into_inner();
        assert_eq!(inner, document());
        assert_eq!(inner.tables(&SchemaPath::new("", "app")).unwrap().len(), 3);
    }

    #[test]
    fn test_schema_filter() {
        let filter = MetaFilter {
            schemas: vec!["app".into()],
            ..Default::default()
        };
        let snapshot = Snapshot::detach(FilteredProvider::new(document(), filter)).unwrap();
        assert_eq!(
            table_names(&snapshot),
            vec!["app.users", "app.orders", "app.audit_log"]
        );
    }

    #[test]
    fn test_qualified_and_bare_table_patterns() {
        let path = TablePath::new("", "staging", "users");
        assert!(matches_table("users", &path));
        assert!(matches_table("staging.users", &path));
        assert!(!matches_table("app.users", &path));
    }

    #[test]
    fn test_excluded_target_drops_foreign_key() {
        let filter = MetaFilter {
            exclude_tables: vec!["app.orders".into()],
            ..Default::default()
        };
        let snapshot = Snapshot::detach(FilteredProvider::new(document(), filter)).unwrap();

        assert_eq!(
            table_names(&snapshot),
            vec!["app.users", "app.audit_log", "staging.users"]
        );
        let audit = snapshot
            .find_table(&TablePath::new("", "app", "audit_log"))
            .unwrap();
        assert!(audit.foreign_keys().is_empty());

        // References to surviving tables are kept.
        let staging = snapshot
            .find_table(&TablePath::new("", "staging", "users"))
            .unwrap();
        assert_eq!(staging.foreign_keys().len(), 1);
    }

    #[test]
    fn test_catalog_filter_excludes_all() {
        let filter = MetaFilter {
            catalogs: vec!["other".into()],
            ..Default::default()
        };
        let snapshot = Snapshot::detach(FilteredProvider::new(document(), filter)).unwrap();
        assert!(snapshot.catalogs().is_empty());
    }
}
