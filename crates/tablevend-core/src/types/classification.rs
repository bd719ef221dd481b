//! File-format classification reported by the catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared format of a table's underlying data objects.
///
/// Unknown classifications are preserved verbatim so the read stage can
/// reject them with a precise error instead of failing to deserialize the
/// access record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Classification {
    /// Comma-separated text with a header row.
    Csv,
    /// Any classification with no read engine in this workspace.
    Other(String),
}

impl Classification {
    /// Parses a catalog `classification` parameter. Matching is
    /// case-insensitive; unknown values are kept as [`Classification::Other`].
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "csv" => Classification::Csv,
            _ => Classification::Other(value.to_string()),
        }
    }

    /// The file extension (without dot) used to match data objects, if this
    /// classification is readable.
    pub fn file_extension(&self) -> Option<&str> {
        match self {
            Classification::Csv => Some("csv"),
            Classification::Other(_) => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Csv => f.write_str("csv"),
            Classification::Other(s) => f.write_str(s),
        }
    }
}

impl From<String> for Classification {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Classification> for String {
    fn from(value: Classification) -> Self {
        value.to_string()
    }
}
