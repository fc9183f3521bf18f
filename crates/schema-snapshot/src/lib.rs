//! # schema-snapshot
//!
//! Detach database schema metadata into a self-contained, immutable snapshot.
//!
//! A metadata provider (a live connection, an exported document, another
//! snapshot) is read once and copied into a graph that no longer needs it:
//!
//! - **Two-phase build**: every node is copied first, then foreign keys are
//!   resolved to keys of the new graph, so forward, cross-schema and
//!   self references all work
//! - **Structural equality**: snapshots compare by names and positions, and
//!   detaching a snapshot again yields an equal snapshot
//! - **Snapshot documents**: versioned, fingerprinted JSON/YAML files that are
//!   validated when read back
//! - **Async providers**: prefetched once, then detached synchronously
//!
//! ## Example
//!
//! ```rust,no_run
//! use schema_snapshot::{MetaDocument, Snapshot, SnapshotDocument};
//!
//! fn main() -> schema_snapshot::Result<()> {
//!     let metadata = MetaDocument::load("shop.yaml", None)?;
//!     let snapshot = Snapshot::detach(&metadata)?;
//!     println!("{} tables", snapshot.stats().tables);
//!
//!     let document = SnapshotDocument::new(snapshot, "shop.yaml")?;
//!     document.save("shop.snapshot.json", Default::default(), true)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod detach;
pub mod error;
pub mod format;
pub mod provider;
pub mod snapshot;

// Re-exports for convenient access
pub use crate::core::{AsyncMetaProvider, MetaProvider, SchemaPath, TablePath};
pub use config::{Config, OutputConfig, SourceConfig};
pub use error::{Result, SnapshotError};
pub use format::DocumentFormat;
pub use provider::{prefetch, FilteredProvider, MetaDocument, MetaFilter};
pub use snapshot::{Snapshot, SnapshotDocument, SnapshotStats, SNAPSHOT_FORMAT_VERSION};
