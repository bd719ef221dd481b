//! The composed access record handed from the vending flow to the read flow.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::classification::Classification;
use crate::types::credentials::VendedCredentials;
use crate::types::location::TableLocation;

/// Everything the read flow needs: vended credentials, where the data lives,
/// what format it is in, and exactly which columns the caller may see.
///
/// `columns` is the authoritative, server-filtered authorized list; the read
/// stage must never request or expose a column absent from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAccess {
    /// Time-boxed object-store credentials.
    pub credentials: VendedCredentials,
    /// Location of the underlying data object(s).
    pub location: TableLocation,
    /// File format tag from the catalog.
    pub classification: Classification,
    /// Ordered column names the caller is authorized to read.
    pub columns: Vec<String>,
}

impl TableAccess {
    /// Fails with `CredentialsExpired` if the vended credentials are past
    /// their expiry at `now`.
    pub fn ensure_fresh(&self, now: Timestamp) -> Result<()> {
        if self.credentials.is_expired(now) {
            return Err(Error::credentials_expired().with_message(format!(
                "vended credentials expired at {}",
                self.credentials.expiration
            )));
        }
        Ok(())
    }
}
