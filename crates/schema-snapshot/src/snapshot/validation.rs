//! Structural validation of a snapshot loaded from outside the engine.
//!
//! A snapshot produced by detachment is consistent by construction. One read
//! back from a file is only trusted after these checks pass.

use super::Snapshot;
use crate::core::Table;
use crate::error::{Result, SnapshotError};

/// Validate ids, member positions and key targets.
pub fn validate(snapshot: &Snapshot) -> Result<()> {
    for (c, catalog) in snapshot.catalogs.iter().enumerate() {
        if catalog.id.0 != c {
            return Err(invalid(format!(
                "catalog {:?} is at position {} but carries id {}",
                catalog.name, c, catalog.id.0
            )));
        }

        for (s, schema) in catalog.schemas.iter().enumerate() {
            if schema.id.catalog != c || schema.id.schema != s {
                return Err(invalid(format!(
                    "schema {:?} carries an id that does not match its position",
                    schema.name
                )));
            }
            if schema.domains.iter().any(|d| d.schema != schema.id)
                || schema.sequences.iter().any(|q| q.schema != schema.id)
                || schema.udts.iter().any(|u| u.schema != schema.id)
            {
                return Err(invalid(format!(
                    "schema {:?} owns an object pointing at another schema",
                    schema.name
                )));
            }

            for (t, table) in schema.tables.iter().enumerate() {
                if table.id.catalog != c || table.id.schema != s || table.id.table != t {
                    return Err(invalid(format!(
                        "table {} carries an id that does not match its position",
                        table.path
                    )));
                }
                if table.path.catalog != catalog.name || table.path.schema != schema.name {
                    return Err(invalid(format!(
                        "table {} is stored under {}.{}",
                        table.path, catalog.name, schema.name
                    )));
                }
                validate_table(snapshot, table)?;
            }
        }
    }

    Ok(())
}

fn validate_table(snapshot: &Snapshot, table: &Table) -> Result<()> {
    let columns = table.fields.len();
    let in_range = |positions: &[usize]| positions.iter().all(|&p| p < columns);

    for (i, field) in table.fields.iter().enumerate() {
        if field.table != table.id || field.position != i {
            return Err(invalid(format!(
                "column {} of {} is not owned by it",
                field.name, table.path
            )));
        }
    }

    for index in &table.indexes {
        if index.table != table.id || !index.fields.iter().all(|f| f.field < columns) {
            return Err(invalid(format!(
                "index {} on {} references columns outside the table",
                index.name, table.path
            )));
        }
    }

    for (k, key) in table.unique_keys.iter().enumerate() {
        if key.id.table != table.id || key.id.key != k || !in_range(&key.fields) {
            return Err(invalid(format!(
                "unique key {} on {} is inconsistent with its table",
                key.name, table.path
            )));
        }
    }

    if let Some(pk) = table.primary_key {
        if pk >= table.unique_keys.len() {
            return Err(invalid(format!(
                "primary key of {} is not one of its unique keys",
                table.path
            )));
        }
    }

    if let Some(identity) = &table.identity {
        if identity.table != table.id || identity.field >= columns {
            return Err(invalid(format!(
                "identity of {} points outside the table",
                table.path
            )));
        }
    }

    for fk in &table.foreign_keys {
        if fk.table != table.id || !in_range(&fk.fields) {
            return Err(invalid(format!(
                "foreign key {} on {} is inconsistent with its table",
                fk.name, table.path
            )));
        }
        let target = snapshot.referenced_key(fk).ok_or_else(|| {
            invalid(format!(
                "foreign key {} on {} references a key outside the snapshot",
                fk.name, table.path
            ))
        })?;
        if target.fields.len() != fk.fields.len() {
            return Err(invalid(format!(
                "foreign key {} on {} has {} columns but its target key {} has {}",
                fk.name,
                table.path,
                fk.fields.len(),
                target.name,
                target.fields.len()
            )));
        }
    }

    Ok(())
}

fn invalid(message: String) -> SnapshotError {
    SnapshotError::InvalidSnapshot(message)
}
