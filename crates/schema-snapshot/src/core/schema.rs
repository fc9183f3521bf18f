//! Entity types of a detached metadata graph.
//!
//! Every entity here is plain owned data. Back-references (a table's schema, a
//! field's table) and cross-table edges (a foreign key's target) are stored as
//! positional ids into the owning [`Snapshot`](crate::Snapshot), never as
//! pointers, so the graph is acyclic in memory and can be serialized as-is.
//!
//! Fields are crate-private: entities are populated by the detachment engine
//! and exposed read-only afterwards. Derived equality compares names and
//! positions, which is the structural equality the engine relies on.

use serde::{Deserialize, Serialize};

use super::identifier::{CatalogId, KeyId, SchemaId, TableId, TablePath};

/// Column data type with its facets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataType {
    /// Type name (e.g., "int", "varchar", "numeric").
    pub name: String,

    /// Maximum length for string/binary types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// Numeric precision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,

    /// Numeric scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,

    /// Whether the column allows NULL.
    #[serde(default = "default_true")]
    pub nullable: bool,

    /// Whether values are generated by the database (identity/serial/auto_increment).
    #[serde(default)]
    pub identity: bool,

    /// Default value expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl DataType {
    /// A nullable type with no facets.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: true,
            ..Default::default()
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self.nullable = false;
        self
    }

    pub fn with_default(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }
}

fn default_true() -> bool {
    true
}

/// Kind of relation a table descriptor stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    #[default]
    Table,
    View,
    MaterializedView,
    Temporary,
    Function,
    Expression,
    Unknown,
}

/// Table options as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableOptions {
    #[serde(default)]
    pub kind: TableKind,

    /// View or function source text, when the provider exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl TableOptions {
    pub fn view(source: impl Into<String>) -> Self {
        Self {
            kind: TableKind::View,
            source: Some(source.into()),
        }
    }
}

/// Sort direction of an index column.
///
/// NULLS FIRST / NULLS LAST placement is not modeled; providers that report it
/// lose that detail here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Check constraint, copied by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// Constraint name.
    pub name: String,

    /// Boolean expression text.
    pub condition: String,

    /// Whether the constraint is enforced.
    #[serde(default = "default_true")]
    pub enforced: bool,
}

impl Check {
    pub fn new(name: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: condition.into(),
            enforced: true,
        }
    }
}

/// Catalog metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub(crate) id: CatalogId,
    pub(crate) name: String,
    pub(crate) comment: String,
    pub(crate) schemas: Vec<Schema>,
}

impl Catalog {
    pub fn id(&self) -> CatalogId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Schemas in provider order.
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.name == name)
    }
}

/// Schema metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub(crate) id: SchemaId,
    pub(crate) name: String,
    pub(crate) comment: String,
    pub(crate) domains: Vec<Domain>,
    pub(crate) tables: Vec<Table>,
    pub(crate) sequences: Vec<Sequence>,
    pub(crate) udts: Vec<Udt>,
}

impl Schema {
    pub fn id(&self) -> SchemaId {
        self.id
    }

    /// Owning catalog.
    pub fn catalog(&self) -> CatalogId {
        self.id.catalog()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Tables in provider order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.path.table == name)
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn udts(&self) -> &[Udt] {
        &self.udts
    }
}

/// Domain (constrained alias type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub(crate) schema: SchemaId,
    pub(crate) name: String,
    pub(crate) data_type: DataType,
    pub(crate) checks: Vec<Check>,
}

impl Domain {
    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }
}

/// Sequence metadata. Numeric parameters are copied by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub(crate) schema: SchemaId,
    pub(crate) name: String,
    pub(crate) data_type: DataType,
    pub(crate) start_with: Option<i64>,
    pub(crate) increment_by: Option<i64>,
    pub(crate) min_value: Option<i64>,
    pub(crate) max_value: Option<i64>,
    pub(crate) cycle: bool,
    pub(crate) cache: Option<i64>,
}

impl Sequence {
    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn start_with(&self) -> Option<i64> {
        self.start_with
    }

    pub fn increment_by(&self) -> Option<i64> {
        self.increment_by
    }

    pub fn min_value(&self) -> Option<i64> {
        self.min_value
    }

    pub fn max_value(&self) -> Option<i64> {
        self.max_value
    }

    pub fn cycle(&self) -> bool {
        self.cycle
    }

    pub fn cache(&self) -> Option<i64> {
        self.cache
    }

    /// Whether this descriptor is bound to a live sequence object. Always false
    /// for a detached sequence.
    pub fn is_live(&self) -> bool {
        false
    }
}

/// Attribute of a user-defined type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub(crate) name: String,
    pub(crate) data_type: DataType,
    pub(crate) comment: String,
}

impl Attribute {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

/// User-defined type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Udt {
    pub(crate) schema: SchemaId,
    pub(crate) name: String,
    pub(crate) package: Option<String>,
    pub(crate) synthetic: bool,
    pub(crate) attributes: Vec<Attribute>,
}

impl Udt {
    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning package (Oracle-style), if any.
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

/// Table metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub(crate) id: TableId,
    pub(crate) path: TablePath,
    pub(crate) comment: String,
    pub(crate) options: TableOptions,
    pub(crate) fields: Vec<Field>,
    pub(crate) indexes: Vec<Index>,
    pub(crate) unique_keys: Vec<UniqueKey>,
    pub(crate) primary_key: Option<usize>,
    pub(crate) foreign_keys: Vec<ForeignKey>,
    pub(crate) checks: Vec<Check>,
    pub(crate) identity: Option<Identity>,
}

impl Table {
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Owning schema.
    pub fn schema(&self) -> SchemaId {
        self.id.schema()
    }

    pub fn name(&self) -> &str {
        &self.path.table
    }

    /// Fully qualified path of the table.
    pub fn path(&self) -> &TablePath {
        &self.path
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Columns in provider order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a column by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Columns at the given positions, in the given order.
    pub fn fields_at<'a>(&'a self, positions: &'a [usize]) -> impl Iterator<Item = &'a Field> + 'a {
        positions.iter().filter_map(move |&p| self.fields.get(p))
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    pub fn unique_keys(&self) -> &[UniqueKey] {
        &self.unique_keys
    }

    /// The primary key. Always one of [`unique_keys`](Self::unique_keys).
    pub fn primary_key(&self) -> Option<&UniqueKey> {
        self.primary_key.and_then(|i| self.unique_keys.get(i))
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The column generating identity values, if any.
    pub fn identity_field(&self) -> Option<&Field> {
        self.identity.as_ref().and_then(|i| self.fields.get(i.field))
    }

    /// Names of the columns at the given positions.
    pub fn field_names(&self, positions: &[usize]) -> Vec<String> {
        self.fields_at(positions).map(|f| f.name.clone()).collect()
    }
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub(crate) table: TableId,
    pub(crate) position: usize,
    pub(crate) name: String,
    pub(crate) data_type: DataType,
    pub(crate) comment: String,
}

impl Field {
    /// Owning table.
    pub fn table(&self) -> TableId {
        self.table
    }

    /// Zero-based position within the table.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

/// One column of an index with its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexField {
    pub(crate) field: usize,
    pub(crate) order: SortOrder,
}

impl IndexField {
    /// Position of the column in the owning table.
    pub fn field(&self) -> usize {
        self.field
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }
}

/// Index metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub(crate) table: TableId,
    pub(crate) name: String,
    pub(crate) fields: Vec<IndexField>,
    pub(crate) unique: bool,
}

impl Index {
    pub fn table(&self) -> TableId {
        self.table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[IndexField] {
        &self.fields
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }
}

/// Unique (or primary) key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueKey {
    pub(crate) id: KeyId,
    pub(crate) name: String,
    pub(crate) fields: Vec<usize>,
    pub(crate) enforced: bool,
}

impl UniqueKey {
    pub fn id(&self) -> KeyId {
        self.id
    }

    /// Owning table.
    pub fn table(&self) -> TableId {
        self.id.table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member column positions in key order.
    pub fn fields(&self) -> &[usize] {
        &self.fields
    }

    pub fn is_enforced(&self) -> bool {
        self.enforced
    }
}

/// Foreign key. The target is always a unique key of the same snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub(crate) table: TableId,
    pub(crate) name: String,
    pub(crate) fields: Vec<usize>,
    pub(crate) enforced: bool,
    pub(crate) key: KeyId,
}

impl ForeignKey {
    /// Referencing table.
    pub fn table(&self) -> TableId {
        self.table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member column positions of the referencing table.
    pub fn fields(&self) -> &[usize] {
        &self.fields
    }

    pub fn is_enforced(&self) -> bool {
        self.enforced
    }

    /// The referenced unique key.
    pub fn key(&self) -> KeyId {
        self.key
    }
}

/// Identity column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub(crate) table: TableId,
    pub(crate) field: usize,
}

impl Identity {
    pub fn table(&self) -> TableId {
        self.table
    }

    /// Position of the identity column.
    pub fn field(&self) -> usize {
        self.field
    }
}
