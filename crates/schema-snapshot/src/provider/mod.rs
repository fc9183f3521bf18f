//! Metadata providers shipped with the crate.
//!
//! - [`MetaDocument`]: an owned catalog/schema/table tree loaded from YAML or JSON
//! - [`FilteredProvider`]: include/exclude rules in front of another provider
//! - [`prefetch`]: reads an [`AsyncMetaProvider`](crate::core::AsyncMetaProvider)
//!   into a [`MetaDocument`]

mod document;
mod filter;
mod prefetch;

pub use document::{CatalogDef, MetaDocument, SchemaDef, TableDef};
pub use filter::{FilteredProvider, MetaFilter};
pub use prefetch::prefetch;
