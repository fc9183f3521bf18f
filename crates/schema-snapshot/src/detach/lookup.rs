//! Structural lookup of unique keys in a copied graph.

use std::collections::HashMap;

use crate::core::{Catalog, KeyId, KeyReference, TablePath};

/// Index from (table path, ordered column names) to the detached unique key.
///
/// Built once after phase 1 so that resolving every foreign key costs one hash
/// lookup plus a scan of the target table's keys.
#[derive(Debug, Default)]
pub(crate) struct KeyIndex {
    tables: HashMap<TablePath, Vec<(Vec<String>, KeyId)>>,
}

impl KeyIndex {
    pub fn build(catalogs: &[Catalog]) -> Self {
        let mut tables: HashMap<TablePath, Vec<(Vec<String>, KeyId)>> = HashMap::new();

        for table in catalogs
            .iter()
            .flat_map(|c| c.schemas.iter())
            .flat_map(|s| s.tables.iter())
        {
            let keys = tables.entry(table.path.clone()).or_default();
            for key in &table.unique_keys {
                keys.push((table.field_names(&key.fields), key.id));
            }
        }

        Self { tables }
    }

    /// Find the key a foreign key declares as its target.
    ///
    /// When a table carries several keys over the same columns, the first one
    /// in provider order is returned.
    pub fn resolve(&self, reference: &KeyReference) -> Option<KeyId> {
        self.tables
            .get(&reference.table)?
            .iter()
            .find(|(fields, _)| *fields == reference.fields)
            .map(|(_, id)| *id)
    }

    /// Number of indexed keys.
    pub fn len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }
}
