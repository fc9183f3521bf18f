//! Provider traits consumed by the detachment engine.
//!
//! - [`MetaProvider`]: synchronous, read-only enumeration of a metadata graph
//! - [`AsyncMetaProvider`]: the same contract for providers backed by async drivers
//!
//! Providers address nodes by path. The engine calls each enumeration at most
//! once per node, during phase 1 only.

use async_trait::async_trait;

use crate::error::Result;

use super::identifier::{SchemaPath, TablePath};
use super::meta::{
    CatalogMeta, DomainMeta, FieldMeta, ForeignKeyMeta, IndexMeta, KeyMeta, SchemaMeta,
    SequenceMeta, TableMeta, UdtMeta,
};
use super::schema::Check;

/// Read-only access to a metadata graph.
///
/// Implementations may be backed by a live connection; the engine never assumes
/// two calls for the same node return the same result, so it asks once.
pub trait MetaProvider {
    /// List catalogs.
    fn catalogs(&self) -> Result<Vec<CatalogMeta>>;

    /// List schemas of a catalog.
    fn schemas(&self, catalog: &str) -> Result<Vec<SchemaMeta>>;

    /// List domains of a schema.
    fn domains(&self, schema: &SchemaPath) -> Result<Vec<DomainMeta>>;

    /// List tables of a schema.
    fn tables(&self, schema: &SchemaPath) -> Result<Vec<TableMeta>>;

    /// List sequences of a schema.
    fn sequences(&self, schema: &SchemaPath) -> Result<Vec<SequenceMeta>>;

    /// List user-defined types of a schema.
    fn udts(&self, schema: &SchemaPath) -> Result<Vec<UdtMeta>>;

    /// List columns of a table.
    fn fields(&self, table: &TablePath) -> Result<Vec<FieldMeta>>;

    /// List indexes of a table.
    fn indexes(&self, table: &TablePath) -> Result<Vec<IndexMeta>>;

    /// List unique keys of a table, including the primary key.
    fn unique_keys(&self, table: &TablePath) -> Result<Vec<KeyMeta>>;

    /// Primary key of a table.
    fn primary_key(&self, table: &TablePath) -> Result<Option<KeyMeta>>;

    /// List foreign keys of a table.
    fn foreign_keys(&self, table: &TablePath) -> Result<Vec<ForeignKeyMeta>>;

    /// List check constraints of a table.
    fn checks(&self, table: &TablePath) -> Result<Vec<Check>>;

    /// Short name of the provider, for logging.
    fn provider_name(&self) -> &str {
        "provider"
    }
}

impl<T: MetaProvider + ?Sized> MetaProvider for &T {
    fn catalogs(&self) -> Result<Vec<CatalogMeta>> {
        (**self).catalogs()
    }

    fn schemas(&self, catalog: &str) -> Result<Vec<SchemaMeta>> {
        (**self).schemas(catalog)
    }

    fn domains(&self, schema: &SchemaPath) -> Result<Vec<DomainMeta>> {
        (**self).domains(schema)
    }

    fn tables(&self, schema: &SchemaPath) -> Result<Vec<TableMeta>> {
        (**self).tables(schema)
    }

    fn sequences(&self, schema: &SchemaPath) -> Result<Vec<SequenceMeta>> {
        (**self).sequences(schema)
    }

    fn udts(&self, schema: &SchemaPath) -> Result<Vec<UdtMeta>> {
        (**self).udts(schema)
    }

    fn fields(&self, table: &TablePath) -> Result<Vec<FieldMeta>> {
        (**self).fields(table)
    }

    fn indexes(&self, table: &TablePath) -> Result<Vec<IndexMeta>> {
        (**self).indexes(table)
    }

    fn unique_keys(&self, table: &TablePath) -> Result<Vec<KeyMeta>> {
        (**self).unique_keys(table)
    }

    fn primary_key(&self, table: &TablePath) -> Result<Option<KeyMeta>> {
        (**self).primary_key(table)
    }

    fn foreign_keys(&self, table: &TablePath) -> Result<Vec<ForeignKeyMeta>> {
        (**self).foreign_keys(table)
    }

    fn checks(&self, table: &TablePath) -> Result<Vec<Check>> {
        (**self).checks(table)
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

impl<T: MetaProvider + ?Sized> MetaProvider for Box<T> {
    fn catalogs(&self) -> Result<Vec<CatalogMeta>> {
        (**self).catalogs()
    }

    fn schemas(&self, catalog: &str) -> Result<Vec<SchemaMeta>> {
        (**self).schemas(catalog)
    }

    fn domains(&self, schema: &SchemaPath) -> Result<Vec<DomainMeta>> {
        (**self).domains(schema)
    }

    fn tables(&self, schema: &SchemaPath) -> Result<Vec<TableMeta>> {
        (**self).tables(schema)
    }

    fn sequences(&self, schema: &SchemaPath) -> Result<Vec<SequenceMeta>> {
        (**self).sequences(schema)
    }

    fn udts(&self, schema: &SchemaPath) -> Result<Vec<UdtMeta>> {
        (**self).udts(schema)
    }

    fn fields(&self, table: &TablePath) -> Result<Vec<FieldMeta>> {
        (**self).fields(table)
    }

    fn indexes(&self, table: &TablePath) -> Result<Vec<IndexMeta>> {
        (**self).indexes(table)
    }

    fn unique_keys(&self, table: &TablePath) -> Result<Vec<KeyMeta>> {
        (**self).unique_keys(table)
    }

    fn primary_key(&self, table: &TablePath) -> Result<Option<KeyMeta>> {
        (**self).primary_key(table)
    }

    fn foreign_keys(&self, table: &TablePath) -> Result<Vec<ForeignKeyMeta>> {
        (**self).foreign_keys(table)
    }

    fn checks(&self, table: &TablePath) -> Result<Vec<Check>> {
        (**self).checks(table)
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

/// Read-only access to a metadata graph through an async driver.
///
/// Async providers are never walked by the engine directly: [`prefetch`]
/// reads every node once into an owned document and the synchronous engine
/// runs on that.
///
/// [`prefetch`]: crate::provider::prefetch
#[async_trait]
pub trait AsyncMetaProvider: Send + Sync {
    async fn catalogs(&self) -> Result<Vec<CatalogMeta>>;

    async fn schemas(&self, catalog: &str) -> Result<Vec<SchemaMeta>>;

    async fn domains(&self, schema: &SchemaPath) -> Result<Vec<DomainMeta>>;

    async fn tables(&self, schema: &SchemaPath) -> Result<Vec<TableMeta>>;

    async fn sequences(&self, schema: &SchemaPath) -> Result<Vec<SequenceMeta>>;

    async fn udts(&self, schema: &SchemaPath) -> Result<Vec<UdtMeta>>;

    async fn fields(&self, table: &TablePath) -> Result<Vec<FieldMeta>>;

    async fn indexes(&self, table: &TablePath) -> Result<Vec<IndexMeta>>;

    async fn unique_keys(&self, table: &TablePath) -> Result<Vec<KeyMeta>>;

    async fn primary_key(&self, table: &TablePath) -> Result<Option<KeyMeta>>;

    async fn foreign_keys(&self, table: &TablePath) -> Result<Vec<ForeignKeyMeta>>;

    async fn checks(&self, table: &TablePath) -> Result<Vec<Check>>;

    /// Short name of the provider, for logging.
    fn provider_name(&self) -> &str {
        "async provider"
    }
}
