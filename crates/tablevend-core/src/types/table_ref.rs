//! Catalog table identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a single table in the data catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRef {
    /// Catalog id (the owning account).
    pub catalog_id: String,
    /// Database name within the catalog.
    pub database: String,
    /// Table name within the database.
    pub table: String,
}

impl TableRef {
    /// Creates a table reference.
    pub fn new(
        catalog_id: impl Into<String>,
        database: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            catalog_id: catalog_id.into(),
            database: database.into(),
            table: table.into(),
        }
    }

    /// Renders the Glue table ARN for `region`.
    pub fn table_arn(&self, region: &str) -> String {
        format!(
            "arn:aws:glue:{region}:{account}:table/{db}/{table}",
            account = self.catalog_id,
            db = self.database,
            table = self.table,
        )
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.table)
    }
}
