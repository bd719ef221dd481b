//! Vending-flow request types.

use tablevend_core::{Error, Result};

/// Session tag key the access-control service is configured to authorize.
pub const DEFAULT_TAG_KEY: &str = "LakeFormationAuthorizedCaller";

/// Default permission granted and vended.
pub const DEFAULT_PERMISSION: &str = "SELECT";

/// Default supported permission type for column-scoped access.
pub const DEFAULT_PERMISSION_TYPE: &str = "COLUMN_PERMISSION";

/// Default credential lifetime in seconds (one hour).
pub const DEFAULT_DURATION_SECONDS: u32 = 3600;

/// Everything the vending flow needs: the target role, the table, the column
/// subset, and the session-tag value that authorizes the assumed session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VendRequest {
    /// ARN of the role receiving the grant and being assumed.
    pub role_arn: String,
    /// Database name within the catalog.
    pub database: String,
    /// Table name within the database.
    pub table: String,
    /// Column names to authorize; must be a subset of the table schema.
    pub columns: Vec<String>,
    /// Session-tag value checked by the access-control service.
    pub tag_value: String,
    /// Session-tag key, [`DEFAULT_TAG_KEY`] unless overridden.
    pub tag_key: String,
    /// Permissions to grant and vend, [`DEFAULT_PERMISSION`] by default.
    pub permissions: Vec<String>,
    /// Supported permission types, [`DEFAULT_PERMISSION_TYPE`] by default.
    pub permission_types: Vec<String>,
    /// Credential lifetime in seconds.
    pub duration_seconds: u32,
}

impl VendRequest {
    /// Creates a request with the default tag key, permissions, permission
    /// types, and duration.
    pub fn new(
        role_arn: impl Into<String>,
        database: impl Into<String>,
        table: impl Into<String>,
        columns: Vec<String>,
        tag_value: impl Into<String>,
    ) -> Self {
        Self {
            role_arn: role_arn.into(),
            database: database.into(),
            table: table.into(),
            columns,
            tag_value: tag_value.into(),
            tag_key: DEFAULT_TAG_KEY.to_string(),
            permissions: vec![DEFAULT_PERMISSION.to_string()],
            permission_types: vec![DEFAULT_PERMISSION_TYPE.to_string()],
            duration_seconds: DEFAULT_DURATION_SECONDS,
        }
    }

    /// Override the session-tag key.
    pub fn tag_key(mut self, key: impl Into<String>) -> Self {
        self.tag_key = key.into();
        self
    }

    /// Override the granted/vended permissions.
    pub fn permissions(mut self, permissions: Vec<String>) -> Self {
        self.permissions = permissions;
        self
    }

    /// Override the supported permission types.
    pub fn permission_types(mut self, types: Vec<String>) -> Self {
        self.permission_types = types;
        self
    }

    /// Override the credential lifetime.
    pub fn duration_seconds(mut self, seconds: u32) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// Validates the request before any service call is made.
    pub fn validate(&self) -> Result<()> {
        if self.role_arn.is_empty() {
            return Err(Error::configuration().with_message("role ARN cannot be empty"));
        }
        if self.database.is_empty() || self.table.is_empty() {
            return Err(
                Error::configuration().with_message("database and table names cannot be empty")
            );
        }
        if self.columns.is_empty() {
            return Err(Error::configuration().with_message("column list cannot be empty"));
        }
        if self.duration_seconds == 0 {
            return Err(
                Error::configuration().with_message("duration must be greater than zero")
            );
        }
        Ok(())
    }
}
