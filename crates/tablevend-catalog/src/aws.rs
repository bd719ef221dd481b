//! AWS-backed permission authority (Lake Formation, Glue, STS).

use aws_config::SdkConfig;
use aws_credential_types::Credentials as StaticCredentials;
use aws_sdk_glue::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_lakeformation::types::{
    DataLakePrincipal, Permission, PermissionType, Resource, TableWithColumnsResource,
};
use jiff::Timestamp;
use rand::Rng;
use tablevend_core::{
    Classification, Error, Result, TableAccess, TableLocation, TableRef, VendedCredentials,
};

use crate::authority::PermissionAuthority;
use crate::request::VendRequest;
use crate::{TRACING_TARGET_GRANT, TRACING_TARGET_VEND};

/// Permission authority backed by the AWS data catalog.
///
/// Grants go through Lake Formation with the caller's ambient identity; the
/// vend assumes the target role with the authorization session tag and uses
/// the assumed identity for the credential and metadata calls, which is what
/// makes the catalog filter the column list server-side.
#[derive(Clone, Debug)]
pub struct AwsPermissionAuthority {
    config: SdkConfig,
}

impl AwsPermissionAuthority {
    /// Builds an authority from an already-loaded SDK configuration.
    pub fn new(config: SdkConfig) -> Self {
        Self { config }
    }

    /// Loads the ambient AWS configuration (environment, profile, IMDS).
    pub async fn from_env() -> Self {
        Self::new(aws_config::load_from_env().await)
    }

    fn region(&self) -> Result<String> {
        self.config
            .region()
            .map(|r| r.to_string())
            .ok_or_else(|| Error::configuration().with_message("no AWS region configured"))
    }

    async fn caller_account(&self) -> Result<String> {
        let sts = aws_sdk_sts::Client::new(&self.config);
        let identity = sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| classify("get_caller_identity", e))?;
        identity
            .account()
            .map(str::to_string)
            .ok_or_else(|| Error::internal().with_message("caller identity has no account id"))
    }

    async fn assume_role(
        &self,
        request: &VendRequest,
        session_name: &str,
    ) -> Result<StaticCredentials> {
        let sts = aws_sdk_sts::Client::new(&self.config);
        let tag = aws_sdk_sts::types::Tag::builder()
            .key(&request.tag_key)
            .value(&request.tag_value)
            .build()
            .map_err(|e| {
                Error::configuration()
                    .with_message("invalid authorization session tag")
                    .with_source(e)
            })?;
        let assumed = sts
            .assume_role()
            .role_arn(&request.role_arn)
            .role_session_name(session_name)
            .tags(tag)
            .send()
            .await
            .map_err(|e| classify("assume_role", e))?;
        let creds = assumed
            .credentials()
            .ok_or_else(|| Error::internal().with_message("assume_role returned no credentials"))?;
        Ok(StaticCredentials::new(
            creds.access_key_id(),
            creds.secret_access_key(),
            Some(creds.session_token().to_string()),
            None,
            "tablevend-assumed-role",
        ))
    }

    fn lakeformation_as(&self, creds: StaticCredentials) -> aws_sdk_lakeformation::Client {
        let conf = aws_sdk_lakeformation::config::Builder::from(&self.config)
            .credentials_provider(creds)
            .build();
        aws_sdk_lakeformation::Client::from_conf(conf)
    }

    fn glue_as(&self, creds: StaticCredentials) -> aws_sdk_glue::Client {
        let conf = aws_sdk_glue::config::Builder::from(&self.config)
            .credentials_provider(creds)
            .build();
        aws_sdk_glue::Client::from_conf(conf)
    }
}

#[async_trait::async_trait]
impl PermissionAuthority for AwsPermissionAuthority {
    async fn grant_columns(&self, request: &VendRequest) -> Result<()> {
        let lf = aws_sdk_lakeformation::Client::new(&self.config);
        let table = TableWithColumnsResource::builder()
            .database_name(&request.database)
            .name(&request.table)
            .set_column_names(Some(request.columns.clone()))
            .build()
            .map_err(|e| {
                Error::configuration()
                    .with_message("invalid table-with-columns resource")
                    .with_source(e)
            })?;
        let permissions: Vec<Permission> = request
            .permissions
            .iter()
            .map(|p| Permission::from(p.as_str()))
            .collect();

        lf.grant_permissions()
            .principal(
                DataLakePrincipal::builder()
                    .data_lake_principal_identifier(&request.role_arn)
                    .build(),
            )
            .resource(Resource::builder().table_with_columns(table).build())
            .set_permissions(Some(permissions))
            .send()
            .await
            .map_err(|e| classify("grant_permissions", e))?;

        tracing::info!(
            target: TRACING_TARGET_GRANT,
            role = %request.role_arn,
            table = %format_args!("{}.{}", request.database, request.table),
            columns = ?request.columns,
            "column-scoped permissions granted"
        );
        Ok(())
    }

    async fn vend(&self, request: &VendRequest) -> Result<TableAccess> {
        let region = self.region()?;
        let account = self.caller_account().await?;
        // Session name convention carried over from the catalog console
        // setup: caller account id plus a short random suffix.
        let session_name = format!("{account}{}", rand::thread_rng().gen_range(0..100));

        let assumed = self.assume_role(request, &session_name).await?;
        tracing::debug!(
            target: TRACING_TARGET_VEND,
            session = %session_name,
            role = %request.role_arn,
            "assumed role session created"
        );

        let lf = self.lakeformation_as(assumed.clone());
        let glue = self.glue_as(assumed);
        let table = TableRef::new(&account, &request.database, &request.table);

        let credentials =
            vend_table_credentials(&lf, &table.table_arn(&region), request).await?;
        let (location, classification, columns) =
            filtered_metadata(&glue, &account, request).await?;

        tracing::info!(
            target: TRACING_TARGET_VEND,
            table = %table,
            location = %location,
            classification = %classification,
            columns = ?columns,
            expiration = %credentials.expiration,
            "temporary table credentials vended"
        );
        Ok(TableAccess {
            credentials,
            location,
            classification,
            columns,
        })
    }
}

async fn vend_table_credentials(
    lf: &aws_sdk_lakeformation::Client,
    table_arn: &str,
    request: &VendRequest,
) -> Result<VendedCredentials> {
    let permissions: Vec<Permission> = request
        .permissions
        .iter()
        .map(|p| Permission::from(p.as_str()))
        .collect();
    let permission_types: Vec<PermissionType> = request
        .permission_types
        .iter()
        .map(|t| PermissionType::from(t.as_str()))
        .collect();

    let resp = lf
        .get_temporary_glue_table_credentials()
        .table_arn(table_arn)
        .set_permissions(Some(permissions))
        .set_supported_permission_types(Some(permission_types))
        .duration_seconds(request.duration_seconds as i32)
        .send()
        .await
        .map_err(|e| classify("get_temporary_glue_table_credentials", e))?;

    let incomplete =
        || Error::internal().with_message("vended credentials are missing required fields");
    let expiration = resp.expiration().ok_or_else(incomplete)?;
    Ok(VendedCredentials {
        access_key_id: resp.access_key_id().ok_or_else(incomplete)?.to_string(),
        secret_access_key: resp.secret_access_key().ok_or_else(incomplete)?.to_string(),
        session_token: resp.session_token().ok_or_else(incomplete)?.to_string(),
        expiration: Timestamp::from_second(expiration.secs()).map_err(|e| {
            Error::internal()
                .with_message("vended credential expiry is out of range")
                .with_source(e)
        })?,
    })
}

async fn filtered_metadata(
    glue: &aws_sdk_glue::Client,
    account: &str,
    request: &VendRequest,
) -> Result<(TableLocation, Classification, Vec<String>)> {
    let permission_types: Vec<aws_sdk_glue::types::PermissionType> = request
        .permission_types
        .iter()
        .map(|t| aws_sdk_glue::types::PermissionType::from(t.as_str()))
        .collect();

    let resp = glue
        .get_unfiltered_table_metadata()
        .catalog_id(account)
        .database_name(&request.database)
        .name(&request.table)
        .set_supported_permission_types(Some(permission_types))
        .send()
        .await
        .map_err(|e| classify("get_unfiltered_table_metadata", e))?;

    let table = resp.table().ok_or_else(|| {
        Error::not_found().with_message(format!(
            "catalog has no table `{}.{}`",
            request.database, request.table
        ))
    })?;
    let location = table
        .storage_descriptor()
        .and_then(|sd| sd.location())
        .ok_or_else(|| {
            Error::invalid_location().with_message("catalog reports no storage location")
        })?;
    let classification = table
        .parameters()
        .and_then(|p| p.get("classification"))
        .map(|c| Classification::parse(c))
        .ok_or_else(|| {
            Error::internal().with_message("catalog table has no classification parameter")
        })?;
    let columns = resp.authorized_columns().to_vec();

    Ok((TableLocation::parse(location)?, classification, columns))
}

/// Maps an SDK error onto the workspace taxonomy by its service error code.
fn classify<E, R>(context: &str, err: SdkError<E, R>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let base = match err.code() {
        Some("AccessDeniedException" | "AccessDenied") => Error::permission_denied(),
        Some("EntityNotFoundException" | "ResourceNotFoundException") => Error::not_found(),
        Some("ExpiredTokenException" | "ExpiredToken" | "InvalidGrantException") => {
            Error::credentials_expired()
        }
        Some(
            "ThrottlingException"
            | "InternalServiceException"
            | "ServiceUnavailableException"
            | "OperationTimeoutException"
            | "RegionDisabledException",
        ) => Error::transient(),
        Some(_) => Error::internal(),
        // Dispatch, construction, and timeout failures never reached the
        // service; treat them as transient network conditions.
        None => Error::transient(),
    };
    let detail = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());
    base.with_message(format!("{context}: {detail}"))
        .with_source(err)
}
