//! Storage location of a table's data objects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

/// URI scheme used when rendering a [`TableLocation`].
///
/// Swapping the scheme only changes the URI prefix; bucket, prefix, and
/// credentials are untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageScheme {
    /// Plain `s3://` URIs.
    #[default]
    S3,
    /// Hadoop-style `s3a://` URIs.
    S3a,
}

impl StorageScheme {
    /// The URI prefix for this scheme, without the `://` separator.
    pub fn prefix(&self) -> &'static str {
        match self {
            StorageScheme::S3 => "s3",
            StorageScheme::S3a => "s3a",
        }
    }
}

/// Parsed object-store location of a table, e.g. `s3://bucket/db/table`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableLocation {
    bucket: String,
    prefix: String,
}

impl TableLocation {
    /// Parses a catalog-reported storage URI.
    ///
    /// Accepts `s3://` and `s3a://` URIs; anything else is an
    /// `InvalidLocation` error. A trailing slash on the prefix is dropped.
    pub fn parse(uri: &str) -> Result<Self, Error> {
        let url = Url::parse(uri).map_err(|e| {
            Error::invalid_location()
                .with_message(format!("cannot parse storage uri `{uri}`"))
                .with_source(e)
        })?;
        if url.scheme() != "s3" && url.scheme() != "s3a" {
            return Err(Error::invalid_location()
                .with_message(format!("unsupported storage scheme `{}`", url.scheme())));
        }
        let bucket = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| {
                Error::invalid_location().with_message(format!("missing bucket in `{uri}`"))
            })?
            .to_string();
        let prefix = url.path().trim_matches('/').to_string();
        Ok(Self { bucket, prefix })
    }

    /// The bucket holding the table's objects.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The key prefix under which the table's objects live.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Renders the location as a URI under the given scheme.
    pub fn url(&self, scheme: StorageScheme) -> String {
        if self.prefix.is_empty() {
            format!("{}://{}", scheme.prefix(), self.bucket)
        } else {
            format!("{}://{}/{}", scheme.prefix(), self.bucket, self.prefix)
        }
    }
}

impl fmt::Display for TableLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url(StorageScheme::S3))
    }
}

impl FromStr for TableLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TableLocation {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TableLocation> for String {
    fn from(value: TableLocation) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bucket_and_prefix() {
        let loc = TableLocation::parse("s3://data-bucket/sales_db/orders").unwrap();
        assert_eq!(loc.bucket(), "data-bucket");
        assert_eq!(loc.prefix(), "sales_db/orders");
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let loc = TableLocation::parse("s3://data-bucket/sales_db/orders/").unwrap();
        assert_eq!(loc.prefix(), "sales_db/orders");
    }

    #[test]
    fn scheme_swap_changes_prefix_only() {
        let loc = TableLocation::parse("s3://data-bucket/sales_db/orders").unwrap();
        assert_eq!(loc.url(StorageScheme::S3), "s3://data-bucket/sales_db/orders");
        assert_eq!(loc.url(StorageScheme::S3a), "s3a://data-bucket/sales_db/orders");
    }

    #[test]
    fn rejects_non_object_store_schemes() {
        let err = TableLocation::parse("https://example.com/data").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidLocation);
    }

    #[test]
    fn rejects_missing_bucket() {
        assert!(TableLocation::parse("s3:///orphan").is_err());
    }

    #[test]
    fn serde_round_trip() {
        let loc = TableLocation::parse("s3://b/p").unwrap();
        let json = serde_json::to_string(&loc).unwrap();
        assert_eq!(json, "\"s3://b/p\"");
        let back: TableLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, loc);
    }
}
