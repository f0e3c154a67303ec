//! Seam between harvested layers and the database they are loaded into.

use crate::config::DbConfig;
use crate::layer::TabularLayer;

/// Index column name used by default when loading a layer.
pub const DEFAULT_INDEX_COLUMN: &str = "idx";

/// What to do when the target table already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExistsPolicy {
    /// Abort the load.
    Fail,
    /// Drop the table and create it again.
    #[default]
    Replace,
    /// Insert rows into the existing table.
    Append,
}

/// Destination of a bulk load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTarget {
    /// Table name.
    pub table: String,
    /// Database schema the table belongs to.
    pub schema: String,
    /// Behaviour when the table already exists.
    pub exists: ExistsPolicy,
    /// Name of the column holding the row index.
    pub index_column: String,
}

impl LoadTarget {
    /// Creates a target replacing `schema.table`, with the index in the [`DEFAULT_INDEX_COLUMN`].
    pub fn new(table: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            schema: schema.into(),
            exists: ExistsPolicy::default(),
            index_column: DEFAULT_INDEX_COLUMN.to_string(),
        }
    }

    /// Target table named after the layer.
    pub fn for_layer(layer: &TabularLayer, schema: impl Into<String>) -> Self {
        Self::new(layer.name(), schema)
    }

    /// Sets the policy for an existing table.
    pub fn with_exists(self, exists: ExistsPolicy) -> Self {
        Self { exists, ..self }
    }

    /// Sets the name of the index column.
    pub fn with_index_column(self, index_column: impl Into<String>) -> Self {
        Self {
            index_column: index_column.into(),
            ..self
        }
    }

    /// Schema-qualified table name.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

/// Loads a layer into a database table.
///
/// Implementations usually render the layer with [`TabularLayer::write_csv`] and stream it into the database with the
/// connection settings from `db`.
pub trait BulkLoader {
    /// Error type of the loader.
    type Error;

    /// Writes all rows of `layer` into `target`.
    fn load(&self, layer: &TabularLayer, target: &LoadTarget, db: &DbConfig)
        -> Result<(), Self::Error>;
}
