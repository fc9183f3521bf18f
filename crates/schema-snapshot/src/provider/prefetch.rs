//! Reading an async provider into an owned document.

use tracing::{debug, info};

use crate::core::{AsyncMetaProvider, SchemaPath};
use crate::error::Result;

use super::document::{CatalogDef, MetaDocument, SchemaDef, TableDef};

/// Read every node of `provider` once, in the order detachment would.
///
/// The returned document is a synchronous provider with the same content, so
/// detachment itself never awaits.
pub async fn prefetch<P: AsyncMetaProvider + ?Sized>(provider: &P) -> Result<MetaDocument> {
    info!("Prefetching metadata from {}", provider.provider_name());

    let mut catalogs = Vec::new();
    for catalog in provider.catalogs().await? {
        let mut schemas = Vec::new();
        for schema in provider.schemas(&catalog.name).await? {
            let path = SchemaPath::new(catalog.name.clone(), schema.name.clone());
            debug!("Prefetching schema {}", path);

            let domains = provider.domains(&path).await?;

            let mut tables = Vec::new();
            for table in provider.tables(&path).await? {
                let table_path = path.table(table.name.clone());
                tables.push(TableDef {
                    fields: provider.fields(&table_path).await?,
                    indexes: provider.indexes(&table_path).await?,
                    unique_keys: provider.unique_keys(&table_path).await?,
                    primary_key: provider.primary_key(&table_path).await?,
                    foreign_keys: provider.foreign_keys(&table_path).await?,
                    checks: provider.checks(&table_path).await?,
                    name: table.name,
                    comment: table.comment,
                    options: table.options,
                });
            }

            schemas.push(SchemaDef {
                name: schema.name,
                comment: schema.comment,
                domains,
                tables,
                sequences: provider.sequences(&path).await?,
                udts: provider.udts(&path).await?,
            });
        }

        catalogs.push(CatalogDef {
            name: catalog.name,
            comment: catalog.comment,
            schemas,
        });
    }

    Ok(MetaDocument { catalogs })
}
