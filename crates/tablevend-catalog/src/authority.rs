//! The permission-authority capability seam.

use tablevend_core::{Result, TableAccess};

use crate::request::VendRequest;

/// Access-control and credential-vending operations of the data catalog.
///
/// The vending flow only talks to the catalog through this trait, so it can
/// be exercised against fakes. The production implementation is
/// [`AwsPermissionAuthority`](crate::AwsPermissionAuthority).
#[async_trait::async_trait]
pub trait PermissionAuthority: Send + Sync {
    /// Grant column-scoped read permission on the requested table to the
    /// request's role.
    ///
    /// This mutates centralized access-control state owned by the catalog;
    /// granting an already-granted permission is an idempotent upsert.
    async fn grant_columns(&self, request: &VendRequest) -> Result<()>;

    /// Assume the request's role with the authorization session tag, vend
    /// time-boxed object-store credentials for the table, and fetch the
    /// filtered metadata (location, classification, authorized columns).
    ///
    /// The returned record composes everything the read flow needs; the
    /// column list is the server-filtered authoritative one, not the list
    /// the caller asked for.
    async fn vend(&self, request: &VendRequest) -> Result<TableAccess>;
}
