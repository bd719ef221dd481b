//! S3 connection from a vended [`TableAccess`] record.

use object_store::aws::AmazonS3Builder;
use tablevend_core::{Error, Result, TableAccess};

use crate::client::ObjectStoreClient;

/// Connection options that are not part of the vended record.
#[derive(Clone, Debug)]
pub struct ConnectOptions {
    /// AWS region (defaults to `us-east-1`).
    pub region: String,
    /// Endpoint URL for S3-compatible services (e.g. MinIO).
    pub endpoint: Option<String>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
        }
    }
}

impl ConnectOptions {
    /// Set the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set a custom endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

/// Build an S3-backed [`ObjectStoreClient`] from the vended credentials and
/// bucket recorded in `access`.
///
/// The credentials are used exactly as vended; the store enforces their
/// expiry server-side, and callers are expected to have checked
/// [`TableAccess::ensure_fresh`] first.
pub fn connect(access: &TableAccess, options: &ConnectOptions) -> Result<ObjectStoreClient> {
    let creds = &access.credentials;
    let mut builder = AmazonS3Builder::new()
        .with_bucket_name(access.location.bucket())
        .with_region(&options.region)
        .with_access_key_id(&creds.access_key_id)
        .with_secret_access_key(&creds.secret_access_key)
        .with_token(&creds.session_token);

    if let Some(endpoint) = &options.endpoint {
        builder = builder.with_endpoint(endpoint);
        if endpoint.starts_with("http://") {
            builder = builder.with_allow_http(true);
        }
    }

    let store = builder.build().map_err(|e| {
        Error::configuration()
            .with_message(format!(
                "cannot build s3 store for bucket `{}`",
                access.location.bucket()
            ))
            .with_source(e)
    })?;

    Ok(ObjectStoreClient::new(store))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use tablevend_core::{Classification, TableLocation, VendedCredentials};

    use super::*;

    fn access() -> TableAccess {
        TableAccess {
            credentials: VendedCredentials {
                access_key_id: "AKIATEST".into(),
                secret_access_key: "secret".into(),
                session_token: "token".into(),
                expiration: Timestamp::from_second(4_102_444_800).unwrap(),
            },
            location: TableLocation::parse("s3://data-bucket/db/table").unwrap(),
            classification: Classification::Csv,
            columns: vec!["id".into()],
        }
    }

    #[test]
    fn builds_store_from_vended_credentials() {
        let client = connect(&access(), &ConnectOptions::default());
        assert!(client.is_ok());
    }

    #[test]
    fn accepts_custom_endpoint() {
        let options = ConnectOptions::default()
            .region("eu-west-1")
            .endpoint("http://localhost:9000");
        assert!(connect(&access(), &options).is_ok());
    }
}
