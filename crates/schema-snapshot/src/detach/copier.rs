//! By-value copiers for columns, checks and schema-level objects.
//!
//! Nothing produced here keeps a reference to the provider's descriptors: every
//! descriptor is consumed and its data moved into the detached entity.

use tracing::debug;

use crate::core::{
    Attribute, Check, DomainMeta, Field, FieldMeta, Identity, SchemaId, SequenceMeta, TableId,
    TablePath, UdtMeta,
};
use crate::core::{Domain, Sequence, Udt};
use crate::error::{Result, SnapshotError};

/// Copy a table's columns, recording the first identity column.
///
/// Later identity-flagged columns are copied as ordinary columns and do not
/// replace the table's identity.
pub(crate) fn copy_fields(
    table: TableId,
    path: &TablePath,
    metas: Vec<FieldMeta>,
) -> (Vec<Field>, Option<Identity>) {
    let mut fields = Vec::with_capacity(metas.len());
    let mut identity: Option<Identity> = None;

    for (position, meta) in metas.into_iter().enumerate() {
        if meta.data_type.identity {
            match identity {
                None => identity = Some(Identity { table, field: position }),
                Some(_) => debug!(
                    "{}: column {} is identity-flagged but the table already has an identity",
                    path, meta.name
                ),
            }
        }
        fields.push(copy_field(table, position, meta));
    }

    (fields, identity)
}

/// Copy one column into the table at `position`.
pub(crate) fn copy_field(table: TableId, position: usize, meta: FieldMeta) -> Field {
    Field {
        table,
        position,
        name: meta.name,
        data_type: meta.data_type,
        comment: meta.comment,
    }
}

/// Copy check constraints by value.
pub(crate) fn copy_checks(checks: Vec<Check>) -> Vec<Check> {
    checks
        .into_iter()
        .map(|c| Check {
            name: c.name,
            condition: c.condition,
            enforced: c.enforced,
        })
        .collect()
}

/// Resolve column names to positions in the detached table.
///
/// `owner` names the key, index or foreign key being copied, for the error.
pub(crate) fn field_positions(
    path: &TablePath,
    fields: &[Field],
    owner: &str,
    names: &[String],
) -> Result<Vec<usize>> {
    names
        .iter()
        .map(|name| {
            fields
                .iter()
                .position(|f| &f.name == name)
                .ok_or_else(|| SnapshotError::unknown_field(path.to_string(), owner, name.clone()))
        })
        .collect()
}

pub(crate) fn copy_domain(schema: SchemaId, meta: DomainMeta) -> Domain {
    Domain {
        schema,
        name: meta.name,
        data_type: meta.data_type,
        checks: copy_checks(meta.checks),
    }
}

/// Copy a sequence. The copy is never bound to a live sequence object.
pub(crate) fn copy_sequence(schema: SchemaId, meta: SequenceMeta) -> Sequence {
    Sequence {
        schema,
        name: meta.name,
        data_type: meta.data_type,
        start_with: meta.start_with,
        increment_by: meta.increment_by,
        min_value: meta.min_value,
        max_value: meta.max_value,
        cycle: meta.cycle,
        cache: meta.cache,
    }
}

pub(crate) fn copy_udt(schema: SchemaId, meta: UdtMeta) -> Udt {
    Udt {
        schema,
        name: meta.name,
        package: meta.package,
        synthetic: meta.synthetic,
        attributes: meta
            .attributes
            .into_iter()
            .map(|a| Attribute {
                name: a.name,
                data_type: a.data_type,
                comment: a.comment,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;

    fn table_id() -> TableId {
        TableId {
            catalog: 0,
            schema: 0,
            table: 0,
        }
    }

    fn path() -> TablePath {
        TablePath::new("", "public", "t")
    }

    #[test]
    fn test_copy_fields_keeps_order_and_facets() {
        let metas = vec![
            FieldMeta::new("id", DataType::new("int").not_null()),
            FieldMeta {
                name: "price".into(),
                data_type: DataType::new("numeric")
                    .with_precision(12, 2)
                    .with_default("0"),
                comment: "unit price".into(),
            },
        ];
        let (fields, identity) = copy_fields(table_id(), &path(), metas);

        assert!(identity.is_none());
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name(), "id");
        assert_eq!(fields[1].position(), 1);
        assert_eq!(fields[1].data_type().scale, Some(2));
        assert_eq!(fields[1].data_type().default.as_deref(), Some("0"));
        assert_eq!(fields[1].comment(), "unit price");
        assert_eq!(fields[1].table(), table_id());
    }

    #[test]
    fn test_first_identity_column_wins() {
        let metas = vec![
            FieldMeta::new("name", DataType::new("text")),
            FieldMeta::new("a", DataType::new("int").identity()),
            FieldMeta::new("b", DataType::new("int").identity()),
        ];
        let (fields, identity) = copy_fields(table_id(), &path(), metas);

        let identity = identity.unwrap();
        assert_eq!(identity.field(), 1);
        assert_eq!(fields[identity.field()].name(), "a");
        // The ignored column is still copied with its flag intact.
        assert!(fields[2].data_type().identity);
    }

    #[test]
    fn test_field_positions_unknown_column() {
        let (fields, _) = copy_fields(
            table_id(),
            &path(),
            vec![FieldMeta::new("id", DataType::new("int"))],
        );
        assert_eq!(
            field_positions(&path(), &fields, "Unique key uk", &["id".to_string()]).unwrap(),
            vec![0]
        );

        let err = field_positions(&path(), &fields, "Unique key uk", &["missing".to_string()])
            .unwrap_err();
        assert!(matches!(err, SnapshotError::UnknownField { ref field, .. } if field == "missing"));
    }

    #[test]
    fn test_copy_sequence_drops_live_binding() {
        let meta = SequenceMeta {
            name: "order_seq".into(),
            data_type: DataType::new("bigint"),
            start_with: Some(100),
            increment_by: Some(5),
            min_value: None,
            max_value: Some(10_000),
            cycle: true,
            cache: Some(20),
            live: true,
        };
        let schema = SchemaId {
            catalog: 0,
            schema: 0,
        };
        let seq = copy_sequence(schema, meta);
        assert!(!seq.is_live());
        assert_eq!(seq.start_with(), Some(100));
        assert_eq!(seq.increment_by(), Some(5));
        assert_eq!(seq.max_value(), Some(10_000));
        assert!(seq.cycle());
        assert_eq!(seq.cache(), Some(20));
    }

    #[test]
    fn test_copy_udt_attributes() {
        let meta = UdtMeta {
            name: "address".into(),
            package: Some("pkg".into()),
            synthetic: false,
            attributes: vec![
                FieldMeta::new("street", DataType::new("varchar").with_length(100)),
                FieldMeta::new("zip", DataType::new("char").with_length(5)),
            ],
        };
        let schema = SchemaId {
            catalog: 0,
            schema: 1,
        };
        let udt = copy_udt(schema, meta);
        assert_eq!(udt.package(), Some("pkg"));
        assert_eq!(udt.attributes().len(), 2);
        assert_eq!(udt.attributes()[1].name(), "zip");
        assert_eq!(udt.schema(), schema);
    }
}
