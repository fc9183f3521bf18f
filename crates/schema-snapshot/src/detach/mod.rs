//! Two-phase detachment of a provider's metadata graph.
//!
//! Phase 1 walks the provider top-down once (catalogs, schemas, then domains,
//! tables, sequences and UDTs) and copies every node. Foreign keys come out of
//! phase 1 as pending references because their target key may belong to a table
//! that is copied later, to a table in another schema, or to the table itself.
//! The provider is dropped as soon as phase 1 returns.
//!
//! Phase 2 indexes every copied unique key by structural signature and turns
//! each pending foreign key into a real edge to a key of the new graph.

mod copier;
mod draft;
mod lookup;

use std::time::Instant;

use tracing::{debug, info};

use crate::core::{
    Catalog, CatalogId, CatalogMeta, MetaProvider, Schema, SchemaId, SchemaMeta, SchemaPath,
    TableId,
};
use crate::error::{Result, SnapshotError};
use crate::snapshot::Snapshot;

use draft::{PendingForeignKey, TableDraft};
use lookup::KeyIndex;

/// Output of phase 1: a complete graph without foreign keys, plus the foreign
/// keys still to be resolved, in table order.
struct CopiedGraph {
    catalogs: Vec<Catalog>,
    pending: Vec<PendingForeignKey>,
}

/// Detach a provider's metadata into a self-contained snapshot.
///
/// The provider is consumed; pass a reference to keep using it afterwards.
/// Either the whole graph is built or an error is returned.
pub fn detach<P: MetaProvider>(provider: P) -> Result<Snapshot> {
    let started = Instant::now();
    let provider_name = provider.provider_name().to_string();

    info!("Phase 1: copying metadata from {}", provider_name);
    let graph = copy_graph(&provider)?;
    drop(provider);

    info!(
        "Phase 2: resolving {} foreign key references",
        graph.pending.len()
    );
    let catalogs = resolve_references(graph)?;
    let snapshot = Snapshot::from_catalogs(catalogs);

    let stats = snapshot.stats();
    info!(
        "Detached {} catalogs, {} schemas, {} tables ({} foreign keys) from {} in {:.3}s",
        stats.catalogs,
        stats.schemas,
        stats.tables,
        stats.foreign_keys,
        provider_name,
        started.elapsed().as_secs_f64()
    );

    Ok(snapshot)
}

fn copy_graph<P: MetaProvider + ?Sized>(provider: &P) -> Result<CopiedGraph> {
    let mut pending = Vec::new();
    let catalogs = provider
        .catalogs()?
        .into_iter()
        .enumerate()
        .map(|(i, meta)| copy_catalog(provider, CatalogId(i), meta, &mut pending))
        .collect::<Result<Vec<_>>>()?;

    Ok(CopiedGraph { catalogs, pending })
}

fn copy_catalog<P: MetaProvider + ?Sized>(
    provider: &P,
    id: CatalogId,
    meta: CatalogMeta,
    pending: &mut Vec<PendingForeignKey>,
) -> Result<Catalog> {
    let schemas = provider
        .schemas(&meta.name)?
        .into_iter()
        .enumerate()
        .map(|(i, schema)| {
            let schema_id = SchemaId {
                catalog: id.0,
                schema: i,
            };
            let path = SchemaPath::new(meta.name.clone(), schema.name.clone());
            copy_schema(provider, schema_id, path, schema, pending)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Catalog {
        id,
        name: meta.name,
        comment: meta.comment,
        schemas,
    })
}

fn copy_schema<P: MetaProvider + ?Sized>(
    provider: &P,
    id: SchemaId,
    path: SchemaPath,
    meta: SchemaMeta,
    pending: &mut Vec<PendingForeignKey>,
) -> Result<Schema> {
    debug!("Copying schema {}", path);

    let domains = provider
        .domains(&path)?
        .into_iter()
        .map(|d| copier::copy_domain(id, d))
        .collect();

    let mut tables = Vec::new();
    for (i, table) in provider.tables(&path)?.into_iter().enumerate() {
        let table_id = TableId {
            catalog: id.catalog,
            schema: id.schema,
            table: i,
        };
        let table_path = path.table(table.name.clone());
        let (table, foreign_keys) =
            TableDraft::copy(provider, table_id, table_path, table)?.into_parts();
        tables.push(table);
        pending.extend(foreign_keys);
    }

    let sequences = provider
        .sequences(&path)?
        .into_iter()
        .map(|s| copier::copy_sequence(id, s))
        .collect();

    let udts = provider
        .udts(&path)?
        .into_iter()
        .map(|u| copier::copy_udt(id, u))
        .collect();

    Ok(Schema {
        id,
        name: meta.name,
        comment: meta.comment,
        domains,
        tables,
        sequences,
        udts,
    })
}

fn resolve_references(graph: CopiedGraph) -> Result<Vec<Catalog>> {
    let CopiedGraph {
        mut catalogs,
        pending,
    } = graph;

    let index = KeyIndex::build(&catalogs);
    debug!("Indexed {} unique keys", index.len());

    for fk in pending {
        let id = fk.table;
        let table = &mut catalogs[id.catalog].schemas[id.schema].tables[id.table];

        let unresolved = || SnapshotError::UnresolvedReference {
            foreign_key: fk.name.clone(),
            table: table.path.to_string(),
            referenced_table: fk.references.table.to_string(),
            fields: fk.references.fields.join(", "),
        };

        let key = index.resolve(&fk.references).ok_or_else(unresolved)?;
        // Columns pair up one to one with the target key.
        if fk.fields.len() != fk.references.fields.len() {
            return Err(unresolved());
        }

        debug!(
            "{}: foreign key {} -> {}",
            table.path, fk.name, fk.references.table
        );
        table.foreign_keys.push(fk.resolve(key));
    }

    Ok(catalogs)
}
