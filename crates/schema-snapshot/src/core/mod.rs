//! Core abstractions shared by the engine and its providers.
//!
//! - [`schema`]: detached entity types (catalog, schema, table, keys, ...)
//! - [`meta`]: descriptors returned by a metadata provider
//! - [`identifier`]: qualified paths and arena ids
//! - [`traits`]: the provider traits the engine consumes

pub mod identifier;
pub mod meta;
pub mod schema;
pub mod traits;

pub use identifier::{CatalogId, KeyId, SchemaId, SchemaPath, TableId, TablePath};
pub use meta::{
    CatalogMeta, DomainMeta, FieldMeta, ForeignKeyMeta, IndexMeta, KeyMeta, KeyReference,
    SchemaMeta, SequenceMeta, SortFieldMeta, TableMeta, UdtMeta,
};
pub use schema::{
    Attribute, Catalog, Check, DataType, Domain, Field, ForeignKey, Identity, Index, IndexField,
    Schema, Sequence, SortOrder, Table, TableKind, TableOptions, Udt, UniqueKey,
};
pub use traits::{AsyncMetaProvider, MetaProvider};
