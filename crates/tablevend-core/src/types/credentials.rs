//! Time-boxed object-store credentials vended by the catalog.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Temporary access key / secret / session token triple with its expiry.
///
/// The record is ephemeral and single-use per read call; it is serialized
/// only for the CLI hand-off between the vending and read commands and is
/// never persisted by this workspace.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendedCredentials {
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token for the temporary identity.
    pub session_token: String,
    /// Instant after which the store rejects these credentials.
    pub expiration: Timestamp,
}

impl VendedCredentials {
    /// Whether the credentials are past their expiry at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expiration
    }
}

// Secret material stays out of debug output and logs.
impl fmt::Debug for VendedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendedCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(expiration: Timestamp) -> VendedCredentials {
        VendedCredentials {
            access_key_id: "AKIATEST".into(),
            secret_access_key: "secret".into(),
            session_token: "token".into(),
            expiration,
        }
    }

    #[test]
    fn expiry_is_inclusive() {
        let at = Timestamp::from_second(1_700_000_000).unwrap();
        let c = creds(at);
        assert!(c.is_expired(at));
        assert!(c.is_expired(at + jiff::Span::new().seconds(1)));
        assert!(!c.is_expired(at - jiff::Span::new().seconds(1)));
    }

    #[test]
    fn debug_redacts_secrets() {
        let c = VendedCredentials {
            access_key_id: "AKIATEST".into(),
            secret_access_key: "sekrit-val".into(),
            session_token: "tok-val".into(),
            expiration: Timestamp::from_second(0).unwrap(),
        };
        let rendered = format!("{c:?}");
        assert!(!rendered.contains("sekrit-val"));
        assert!(!rendered.contains("tok-val"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("AKIATEST"));
    }

    #[test]
    fn serde_round_trips_expiration() {
        let c = creds(Timestamp::from_second(1_700_000_000).unwrap());
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("2023-11-14T22:13:20Z"));
        let back: VendedCredentials = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
