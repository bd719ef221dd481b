//! The credential-vending flow: grant, then vend.

use tablevend_core::{Result, TableAccess};

use crate::authority::PermissionAuthority;
use crate::request::VendRequest;
use crate::{TRACING_TARGET_GRANT, TRACING_TARGET_VEND};

/// Grants column-scoped permissions to the request's role, then vends
/// time-boxed credentials and the filtered table metadata as one
/// [`TableAccess`] record.
///
/// A grant failure is logged and does not abort the vend: the grant is an
/// idempotent upsert of centralized ACL state, and a pre-existing grant makes
/// the call redundant. Every vend failure propagates typed so callers can
/// tell retryable conditions from fatal ones.
pub async fn grant_and_vend<A: PermissionAuthority + ?Sized>(
    authority: &A,
    request: &VendRequest,
) -> Result<TableAccess> {
    request.validate()?;

    if let Err(error) = authority.grant_columns(request).await {
        tracing::warn!(
            target: TRACING_TARGET_GRANT,
            role = %request.role_arn,
            error = %error,
            "column grant failed; attempting vend with existing permissions"
        );
    }

    let access = authority.vend(request).await?;
    tracing::debug!(
        target: TRACING_TARGET_VEND,
        columns = access.columns.len(),
        "vending flow complete"
    );
    Ok(access)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use jiff::Timestamp;
    use tablevend_core::{
        Classification, Error, ErrorKind, TableLocation, VendedCredentials,
    };

    use super::*;

    #[derive(Default)]
    struct FakeAuthority {
        fail_grant: bool,
        fail_vend: bool,
        grants: AtomicUsize,
        vends: AtomicUsize,
    }

    fn sample_access() -> TableAccess {
        TableAccess {
            credentials: VendedCredentials {
                access_key_id: "AKIATEST".into(),
                secret_access_key: "secret".into(),
                session_token: "token".into(),
                expiration: Timestamp::from_second(4_102_444_800).unwrap(),
            },
            location: TableLocation::parse("s3://bucket/db/table").unwrap(),
            classification: Classification::Csv,
            columns: vec!["id".into(), "total".into()],
        }
    }

    #[async_trait::async_trait]
    impl PermissionAuthority for FakeAuthority {
        async fn grant_columns(&self, _request: &VendRequest) -> tablevend_core::Result<()> {
            self.grants.fetch_add(1, Ordering::SeqCst);
            if self.fail_grant {
                return Err(Error::permission_denied().with_message("grant rejected"));
            }
            Ok(())
        }

        async fn vend(&self, _request: &VendRequest) -> tablevend_core::Result<TableAccess> {
            self.vends.fetch_add(1, Ordering::SeqCst);
            if self.fail_vend {
                return Err(Error::transient().with_message("service unavailable"));
            }
            Ok(sample_access())
        }
    }

    fn request() -> VendRequest {
        VendRequest::new(
            "arn:aws:iam::123456789012:role/consumer",
            "sales_db",
            "orders",
            vec!["id".into(), "total".into()],
            "analytics",
        )
    }

    #[tokio::test]
    async fn happy_path_returns_composed_record() {
        let authority = FakeAuthority::default();
        let access = grant_and_vend(&authority, &request()).await.unwrap();
        assert_eq!(access.columns, vec!["id", "total"]);
        assert_eq!(authority.grants.load(Ordering::SeqCst), 1);
        assert_eq!(authority.vends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn grant_failure_does_not_abort_the_vend() {
        let authority = FakeAuthority {
            fail_grant: true,
            ..Default::default()
        };
        let access = grant_and_vend(&authority, &request()).await.unwrap();
        assert_eq!(access.columns.len(), 2);
        assert_eq!(authority.vends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn vend_failure_propagates_typed() {
        let authority = FakeAuthority {
            fail_vend: true,
            ..Default::default()
        };
        let err = grant_and_vend(&authority, &request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transient);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn invalid_request_fails_before_any_call() {
        let authority = FakeAuthority::default();
        let mut req = request();
        req.columns.clear();
        let err = grant_and_vend(&authority, &req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(authority.grants.load(Ordering::SeqCst), 0);
        assert_eq!(authority.vends.load(Ordering::SeqCst), 0);
    }
}
