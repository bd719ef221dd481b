//! Thin client over [`object_store::ObjectStore`].
//!
//! [`ObjectStoreClient`] is a cloneable wrapper around `Arc<dyn ObjectStore>`
//! covering the two operations the read flow needs: listing the objects
//! under a table's prefix and fetching a single object's bytes. Both are
//! instrumented with [`tracing`].

use std::sync::Arc;

use bytes::Bytes;
use futures::TryStreamExt;
use object_store::path::Path;
use object_store::{ObjectMeta, ObjectStore};
use tablevend_core::{Error, Result};

/// Cloneable handle to any [`ObjectStore`] backend.
///
/// Production code connects it to S3 with vended credentials via
/// [`connect`](crate::connect); tests substitute
/// [`object_store::memory::InMemory`] through the same wrapper.
#[derive(Clone, Debug)]
pub struct ObjectStoreClient(pub Arc<dyn ObjectStore>);

impl ObjectStoreClient {
    /// Wrap a concrete [`ObjectStore`] implementation.
    pub fn new(store: impl ObjectStore) -> Self {
        Self(Arc::new(store))
    }

    /// List object metadata under `prefix`.
    #[tracing::instrument(name = "object.list", skip(self), fields(prefix))]
    pub async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>> {
        let prefix = if prefix.is_empty() {
            None
        } else {
            Some(Path::from(prefix))
        };
        self.0
            .list(prefix.as_ref())
            .try_collect()
            .await
            .map_err(from_object_store)
    }

    /// Retrieve the raw bytes stored at `key`.
    #[tracing::instrument(name = "object.get", skip(self), fields(key))]
    pub async fn get(&self, key: &str) -> Result<Bytes> {
        let path = Path::from(key);
        let result = self.0.get(&path).await.map_err(from_object_store)?;
        result.bytes().await.map_err(from_object_store)
    }
}

/// Convert an [`object_store::Error`] into the workspace error taxonomy.
fn from_object_store(err: object_store::Error) -> Error {
    let base = match err {
        object_store::Error::NotFound { .. } => Error::not_found(),
        object_store::Error::PermissionDenied { .. }
        | object_store::Error::Unauthenticated { .. } => Error::permission_denied(),
        object_store::Error::AlreadyExists { .. } | object_store::Error::Precondition { .. } => {
            Error::internal()
        }
        _ => Error::transient(),
    };
    base.with_message(err.to_string()).with_source(err)
}
