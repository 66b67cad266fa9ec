//! Credential entities for QR-encoded enrollment tokens.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::student::StudentRecord;

/// Claims structure for the signed credential payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialClaims {
    /// Subject (student code)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Token ID, distinguishes two tokens minted for one subject within the same second
    pub jti: String,
}

impl CredentialClaims {
    /// Creates claims for `subject` valid for `validity` starting at `issued_at`
    ///
    /// Timestamps are truncated to whole seconds, as carried on the wire.
    pub fn new(
        subject: impl Into<String>,
        issuer: impl Into<String>,
        issued_at: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: subject.into(),
            iat,
            exp: iat.saturating_add(validity.num_seconds()),
            iss: issuer.into(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks whether the claims have expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// `iat` as a timestamp, `None` when outside the representable range
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    /// `exp` as a timestamp, `None` when outside the representable range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// A freshly minted token together with its decoded lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCredential {
    /// Encoded, signed token string
    pub token: String,

    /// Subject the token is bound to
    pub subject: String,

    /// Timestamp embedded as `iat`
    pub issued_at: DateTime<Utc>,

    /// Timestamp embedded as `exp`
    pub expires_at: DateTime<Utc>,
}

/// The single currently valid token cached for a subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Subject (student code)
    pub subject: String,

    /// Token string as handed to the client
    pub token: String,

    /// Always equal to the token's embedded expiry
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(subject: impl Into<String>, token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            subject: subject.into(),
            token: token.into(),
            expires_at,
        }
    }

    /// Whether the entry can still be handed out at `now`
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Whole seconds left before expiry, never negative
    pub fn seconds_remaining_at(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

impl From<&SignedCredential> for CacheEntry {
    fn from(signed: &SignedCredential) -> Self {
        Self {
            subject: signed.subject.clone(),
            token: signed.token.clone(),
            expires_at: signed.expires_at,
        }
    }
}

/// Result of an issuance request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCredential {
    /// QR image as a `data:image/png;base64,...` URL
    pub image: String,

    /// Raw signed token (without namespace marker)
    pub token: String,

    /// Seconds until the token expires
    pub expires_in_seconds: i64,

    /// True when an existing, still valid token was handed out again
    pub reused: bool,
}

/// Result of a successful validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedCredential {
    /// Subject embedded in the token
    pub subject: String,

    /// Directory record of the subject at validation time
    pub record: StudentRecord,
}
