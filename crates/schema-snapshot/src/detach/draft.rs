//! Per-table copy with deferred foreign keys.
//!
//! A [`TableDraft`] owns a table whose columns, indexes, unique keys, primary
//! key, checks and identity are final. Its foreign keys are held as
//! [`PendingForeignKey`]s: the key they target may live on a table that has not
//! been copied yet, so the edge is only materialized once the whole graph exists.

use tracing::{debug, warn};

use crate::core::{
    ForeignKey, ForeignKeyMeta, Index, IndexField, IndexMeta, KeyId, KeyMeta, KeyReference,
    MetaProvider, Table, TableId, TableMeta, TablePath, UniqueKey,
};
use crate::error::Result;

use super::copier;

/// A copied foreign key whose target has not been resolved.
#[derive(Debug, Clone)]
pub(crate) struct PendingForeignKey {
    pub table: TableId,
    pub name: String,
    pub fields: Vec<usize>,
    pub enforced: bool,
    pub references: KeyReference,
}

impl PendingForeignKey {
    /// Materialize the foreign key pointing at `key`.
    pub fn resolve(self, key: KeyId) -> ForeignKey {
        ForeignKey {
            table: self.table,
            name: self.name,
            fields: self.fields,
            enforced: self.enforced,
            key,
        }
    }
}

/// A table copied in phase 1.
#[derive(Debug)]
pub(crate) struct TableDraft {
    table: Table,
    pending: Vec<PendingForeignKey>,
}

impl TableDraft {
    /// Copy one table and everything it owns from the provider.
    pub fn copy<P: MetaProvider + ?Sized>(
        provider: &P,
        id: TableId,
        path: TablePath,
        meta: TableMeta,
    ) -> Result<Self> {
        let (fields, identity) = copier::copy_fields(id, &path, provider.fields(&path)?);

        let mut table = Table {
            id,
            path,
            comment: meta.comment,
            options: meta.options,
            fields,
            indexes: Vec::new(),
            unique_keys: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            checks: Vec::new(),
            identity,
        };

        let indexes = provider.indexes(&table.path)?;
        table.indexes = copy_indexes(&table, indexes)?;

        let keys = provider.unique_keys(&table.path)?;
        table.unique_keys = copy_unique_keys(&table, &keys)?;

        if let Some(pk) = provider.primary_key(&table.path)? {
            table.primary_key = keys.iter().position(|uk| uk.same_key(&pk));
            if table.primary_key.is_none() {
                warn!(
                    "{}: primary key {} is not among the table's unique keys, ignoring it",
                    table.path, pk.name
                );
            }
        }

        let foreign_keys = provider.foreign_keys(&table.path)?;
        let pending = copy_foreign_keys(&table, foreign_keys)?;

        table.checks = copier::copy_checks(provider.checks(&table.path)?);

        debug!(
            "{}: copied {} columns, {} keys, {} indexes, {} pending foreign keys",
            table.path,
            table.fields.len(),
            table.unique_keys.len(),
            table.indexes.len(),
            pending.len()
        );

        Ok(Self { table, pending })
    }

    pub fn into_parts(self) -> (Table, Vec<PendingForeignKey>) {
        (self.table, self.pending)
    }
}

fn copy_indexes(table: &Table, metas: Vec<IndexMeta>) -> Result<Vec<Index>> {
    metas
        .into_iter()
        .map(|meta| {
            let owner = format!("Index {}", meta.name);
            let fields = meta
                .fields
                .iter()
                .map(|sf| {
                    let positions = copier::field_positions(
                        &table.path,
                        &table.fields,
                        &owner,
                        std::slice::from_ref(&sf.name),
                    )?;
                    Ok(IndexField {
                        field: positions[0],
                        order: sf.order,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(Index {
                table: table.id,
                name: meta.name,
                fields,
                unique: meta.unique,
            })
        })
        .collect()
}

fn copy_unique_keys(table: &Table, metas: &[KeyMeta]) -> Result<Vec<UniqueKey>> {
    metas
        .iter()
        .enumerate()
        .map(|(i, meta)| {
            let owner = format!("Unique key {}", meta.name);
            Ok(UniqueKey {
                id: KeyId {
                    table: table.id,
                    key: i,
                },
                name: meta.name.clone(),
                fields: copier::field_positions(&table.path, &table.fields, &owner, &meta.fields)?,
                enforced: meta.enforced,
            })
        })
        .collect()
}

fn copy_foreign_keys(table: &Table, metas: Vec<ForeignKeyMeta>) -> Result<Vec<PendingForeignKey>> {
    metas
        .into_iter()
        .map(|meta| {
            let owner = format!("Foreign key {}", meta.name);
            let fields = copier::field_positions(&table.path, &table.fields, &owner, &meta.fields)?;
            Ok(PendingForeignKey {
                table: table.id,
                name: meta.name,
                fields,
                enforced: meta.enforced,
                references: meta.references,
            })
        })
        .collect()
}
