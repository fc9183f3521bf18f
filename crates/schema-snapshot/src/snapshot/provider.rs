//! A snapshot is itself a metadata provider, so it can be detached again.

use crate::core::{
    Catalog, CatalogMeta, Check, DomainMeta, FieldMeta, ForeignKeyMeta, IndexMeta, KeyMeta,
    KeyReference, MetaProvider, Schema, SchemaMeta, SchemaPath, SequenceMeta, SortFieldMeta,
    Table, TableMeta, TablePath, UdtMeta, UniqueKey,
};
use crate::error::{Result, SnapshotError};

use super::Snapshot;

impl Snapshot {
    fn require_catalog(&self, name: &str) -> Result<&Catalog> {
        self.catalog_by_name(name).ok_or_else(|| {
            SnapshotError::source_access(
                format!("reading catalog {:?}", name),
                "catalog not found in snapshot",
            )
        })
    }

    fn require_schema(&self, path: &SchemaPath) -> Result<&Schema> {
        self.require_catalog(&path.catalog)?
            .schema(&path.schema)
            .ok_or_else(|| {
                SnapshotError::source_access(
                    format!("reading schema {}", path),
                    "schema not found in snapshot",
                )
            })
    }

    fn require_table(&self, path: &TablePath) -> Result<&Table> {
        self.find_table(path).ok_or_else(|| {
            SnapshotError::source_access(
                format!("reading table {}", path),
                "table not found in snapshot",
            )
        })
    }

    fn key_meta(table: &Table, key: &UniqueKey) -> KeyMeta {
        KeyMeta {
            name: key.name.clone(),
            fields: table.field_names(&key.fields),
            enforced: key.enforced,
        }
    }
}

impl MetaProvider for Snapshot {
    fn catalogs(&self) -> Result<Vec<CatalogMeta>> {
        Ok(self
            .catalogs()
            .iter()
            .map(|c| CatalogMeta {
                name: c.name.clone(),
                comment: c.comment.clone(),
            })
            .collect())
    }

    fn schemas(&self, catalog: &str) -> Result<Vec<SchemaMeta>> {
        Ok(self
            .require_catalog(catalog)?
            .schemas
            .iter()
            .map(|s| SchemaMeta {
                name: s.name.clone(),
                comment: s.comment.clone(),
            })
            .collect())
    }

    fn domains(&self, schema: &SchemaPath) -> Result<Vec<DomainMeta>> {
        Ok(self
            .require_schema(schema)?
            .domains
            .iter()
            .map(|d| DomainMeta {
                name: d.name.clone(),
                data_type: d.data_type.clone(),
                checks: d.checks.clone(),
            })
            .collect())
    }

    fn tables(&self, schema: &SchemaPath) -> Result<Vec<TableMeta>> {
        Ok(self
            .require_schema(schema)?
            .tables
            .iter()
            .map(|t| TableMeta {
                name: t.path.table.clone(),
                comment: t.comment.clone(),
                options: t.options.clone(),
            })
            .collect())
    }

    fn sequences(&self, schema: &SchemaPath) -> Result<Vec<SequenceMeta>> {
        Ok(self
            .require_schema(schema)?
            .sequences
            .iter()
            .map(|s| SequenceMeta {
                name: s.name.clone(),
                data_type: s.data_type.clone(),
                start_with: s.start_with,
                increment_by: s.increment_by,
                min_value: s.min_value,
                max_value: s.max_value,
                cycle: s.cycle,
                cache: s.cache,
                live: false,
            })
            .collect())
    }

    fn udts(&self, schema: &SchemaPath) -> Result<Vec<UdtMeta>> {
        Ok(self
            .require_schema(schema)?
            .udts
            .iter()
            .map(|u| UdtMeta {
                name: u.name.clone(),
                package: u.package.clone(),
                synthetic: u.synthetic,
                attributes: u
                    .attributes
                    .iter()
                    .map(|a| FieldMeta {
                        name: a.name.clone(),
                        data_type: a.data_type.clone(),
                        comment: a.comment.clone(),
                    })
                    .collect(),
            })
            .collect())
    }

    fn fields(&self, table: &TablePath) -> Result<Vec<FieldMeta>> {
        Ok(self
            .require_table(table)?
            .fields
            .iter()
            .map(|f| FieldMeta {
                name: f.name.clone(),
                data_type: f.data_type.clone(),
                comment: f.comment.clone(),
            })
            .collect())
    }

    fn indexes(&self, table: &TablePath) -> Result<Vec<IndexMeta>> {
        let table = self.require_table(table)?;
        Ok(table
            .indexes
            .iter()
            .map(|idx| IndexMeta {
                name: idx.name.clone(),
                fields: idx
                    .fields
                    .iter()
                    .filter_map(|f| {
                        table.fields.get(f.field).map(|field| SortFieldMeta {
                            name: field.name.clone(),
                            order: f.order,
                        })
                    })
                    .collect(),
                unique: idx.unique,
            })
            .collect())
    }

    fn unique_keys(&self, table: &TablePath) -> Result<Vec<KeyMeta>> {
        let table = self.require_table(table)?;
        Ok(table
            .unique_keys
            .iter()
            .map(|uk| Self::key_meta(table, uk))
            .collect())
    }

    fn primary_key(&self, table: &TablePath) -> Result<Option<KeyMeta>> {
        let table = self.require_table(table)?;
        Ok(table.primary_key().map(|pk| Self::key_meta(table, pk)))
    }

    fn foreign_keys(&self, table: &TablePath) -> Result<Vec<ForeignKeyMeta>> {
        let table = self.require_table(table)?;
        table
            .foreign_keys
            .iter()
            .map(|fk| {
                let (target_table, target_key) = self
                    .referenced_table(fk)
                    .zip(self.referenced_key(fk))
                    .ok_or_else(|| {
                        SnapshotError::InvalidSnapshot(format!(
                            "foreign key {} on {} has no target",
                            fk.name, table.path
                        ))
                    })?;
                Ok(ForeignKeyMeta {
                    name: fk.name.clone(),
                    fields: table.field_names(&fk.fields),
                    enforced: fk.enforced,
                    references: KeyReference {
                        table: target_table.path.clone(),
                        fields: target_table.field_names(&target_key.fields),
                    },
                })
            })
            .collect()
    }

    fn checks(&self, table: &TablePath) -> Result<Vec<Check>> {
        Ok(self.require_table(table)?.checks.clone())
    }

    fn provider_name(&self) -> &str {
        "snapshot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataType, ForeignKeyMeta, SortOrder};
    use crate::provider::{MetaDocument, TableDef};

    fn snapshot() -> Snapshot {
        let mut t = TableDef::new("items");
        t.fields = vec![
            FieldMeta::new("id", DataType::new("int").not_null()),
            FieldMeta::new("sku", DataType::new("varchar").with_length(32)),
            FieldMeta::new("parent", DataType::new("int")),
        ];
        t.indexes = vec![IndexMeta {
            name: "ix_items_sku".into(),
            fields: vec![
                SortFieldMeta {
                    name: "sku".into(),
                    order: SortOrder::Desc,
                },
                SortFieldMeta {
                    name: "id".into(),
                    order: SortOrder::Asc,
                },
            ],
            unique: true,
        }];
        t.unique_keys = vec![KeyMeta::new("pk_items", ["id"])];
        t.primary_key = Some(KeyMeta::new("pk_items", ["id"]));
        t.foreign_keys = vec![ForeignKeyMeta::new(
            "fk_items_parent",
            ["parent"],
            TablePath::new("", "inv", "items"),
            ["id"],
        )];
        Snapshot::detach(MetaDocument::single_schema("inv", vec![t])).unwrap()
    }

    #[test]
    fn test_indexes_round_trip_names_and_order() {
        let snapshot = snapshot();
        let indexes = snapshot
            .indexes(&TablePath::new("", "inv", "items"))
            .unwrap();
        assert_eq!(indexes.len(), 1);
        assert_eq!(indexes[0].fields[0].name, "sku");
        assert_eq!(indexes[0].fields[0].order, SortOrder::Desc);
        assert!(indexes[0].unique);
    }

    #[test]
    fn test_foreign_keys_report_target_by_name() {
        let snapshot = snapshot();
        let fks = snapshot
            .foreign_keys(&TablePath::new("", "inv", "items"))
            .unwrap();
        assert_eq!(fks[0].fields, vec!["parent"]);
        assert_eq!(fks[0].references.table, TablePath::new("", "inv", "items"));
        assert_eq!(fks[0].references.fields, vec!["id"]);
    }

    #[test]
    fn test_unknown_path_is_source_access_error() {
        let snapshot = snapshot();
        let err = snapshot
            .fields(&TablePath::new("", "inv", "missing"))
            .unwrap_err();
        assert!(matches!(err, SnapshotError::SourceAccess { .. }));
        assert!(snapshot.schemas("nope").is_err());
    }
}
