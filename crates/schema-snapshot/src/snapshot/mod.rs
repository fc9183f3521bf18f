//! The detached snapshot and its navigation API.

mod document;
mod provider;
mod validation;

pub use document::{SnapshotDocument, SNAPSHOT_FORMAT_VERSION};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::{
    AsyncMetaProvider, Catalog, CatalogId, ForeignKey, KeyId, MetaProvider, Schema, SchemaId,
    Table, TableId, TablePath, UniqueKey,
};
use crate::error::Result;

/// A self-contained, immutable copy of a database's metadata.
///
/// Built once by [`Snapshot::detach`]; nothing in it refers back to the provider
/// it came from. Cross-table edges are positional ids into this snapshot, so it
/// serializes as a tree and can be shared across threads for reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    catalogs: Vec<Catalog>,
}

/// Entity counts of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SnapshotStats {
    pub catalogs: usize,
    pub schemas: usize,
    pub domains: usize,
    pub tables: usize,
    pub fields: usize,
    pub indexes: usize,
    pub unique_keys: usize,
    pub primary_keys: usize,
    pub foreign_keys: usize,
    pub checks: usize,
    pub sequences: usize,
    pub udts: usize,
}

impl Snapshot {
    /// Detach a provider's metadata. See [`crate::detach::detach`].
    pub fn detach<P: MetaProvider>(provider: P) -> Result<Self> {
        crate::detach::detach(provider)
    }

    /// Read an async provider once, then detach the result.
    pub async fn detach_async<P: AsyncMetaProvider + ?Sized>(provider: &P) -> Result<Self> {
        let document = crate::provider::prefetch(provider).await?;
        crate::detach::detach(document)
    }

    pub(crate) fn from_catalogs(catalogs: Vec<Catalog>) -> Self {
        Self { catalogs }
    }

    /// An empty snapshot.
    pub fn empty() -> Self {
        Self {
            catalogs: Vec::new(),
        }
    }

    /// Catalogs in provider order.
    pub fn catalogs(&self) -> &[Catalog] {
        &self.catalogs
    }

    pub fn catalog(&self, id: CatalogId) -> Option<&Catalog> {
        self.catalogs.get(id.0)
    }

    pub fn catalog_by_name(&self, name: &str) -> Option<&Catalog> {
        self.catalogs.iter().find(|c| c.name == name)
    }

    pub fn schema(&self, id: SchemaId) -> Option<&Schema> {
        self.catalogs.get(id.catalog)?.schemas.get(id.schema)
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.catalogs
            .get(id.catalog)?
            .schemas
            .get(id.schema)?
            .tables
            .get(id.table)
    }

    /// Find a table by qualified path.
    pub fn find_table(&self, path: &TablePath) -> Option<&Table> {
        self.catalog_by_name(&path.catalog)?
            .schema(&path.schema)?
            .table(&path.table)
    }

    pub fn unique_key(&self, id: KeyId) -> Option<&UniqueKey> {
        self.table(id.table)?.unique_keys.get(id.key)
    }

    /// The unique key a foreign key points at.
    pub fn referenced_key(&self, fk: &ForeignKey) -> Option<&UniqueKey> {
        self.unique_key(fk.key)
    }

    /// The table owning the unique key a foreign key points at.
    pub fn referenced_table(&self, fk: &ForeignKey) -> Option<&Table> {
        self.table(fk.key.table)
    }

    /// All tables, catalog by catalog and schema by schema.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.catalogs
            .iter()
            .flat_map(|c| c.schemas.iter())
            .flat_map(|s| s.tables.iter())
    }

    /// Foreign keys of other tables (or the same table) that reference `table`.
    pub fn referencing_keys(&self, table: TableId) -> impl Iterator<Item = &ForeignKey> {
        self.tables()
            .flat_map(|t| t.foreign_keys.iter())
            .filter(move |fk| fk.key.table == table)
    }

    pub fn stats(&self) -> SnapshotStats {
        let mut stats = SnapshotStats {
            catalogs: self.catalogs.len(),
            ..Default::default()
        };

        for schema in self.catalogs.iter().flat_map(|c| c.schemas.iter()) {
            stats.schemas += 1;
            stats.domains += schema.domains.len();
            stats.sequences += schema.sequences.len();
            stats.udts += schema.udts.len();
            for table in &schema.tables {
                stats.tables += 1;
                stats.fields += table.fields.len();
                stats.indexes += table.indexes.len();
                stats.unique_keys += table.unique_keys.len();
                stats.primary_keys += usize::from(table.primary_key.is_some());
                stats.foreign_keys += table.foreign_keys.len();
                stats.checks += table.checks.len();
            }
        }

        stats
    }

    /// SHA-256 over the canonical JSON form, as lowercase hex.
    ///
    /// Two snapshots with the same shape have the same fingerprint.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Check internal consistency (ids, positions, key targets).
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Parse and validate a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
