//! HMAC signer for credential tokens

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use carnet_shared::CredentialConfig;

use crate::domain::entities::credential::{CredentialClaims, SignedCredential};
use crate::errors::{CredentialError, DomainError};

/// Outcome of verifying a presented token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Signature matches and the token is inside its window
    Valid(CredentialClaims),
    /// Signature matches but the window has closed
    Expired(CredentialClaims),
    /// Malformed, foreign issuer, or signature mismatch
    Invalid,
}

impl Verification {
    pub fn claims(&self) -> Option<&CredentialClaims> {
        match self {
            Verification::Valid(claims) | Verification::Expired(claims) => Some(claims),
            Verification::Invalid => None,
        }
    }
}

/// Stateless signer binding a subject to a fixed validity window
pub struct CredentialSigner {
    issuer: String,
    validity: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl CredentialSigner {
    /// Creates a signer from the credential configuration
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the secret is empty or the
    /// validity window is zero or out of range.
    pub fn new(config: &CredentialConfig) -> Result<Self, DomainError> {
        config.validate().map_err(|e| DomainError::Validation {
            message: e.to_string(),
        })?;

        let validity = i64::try_from(config.validity_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| DomainError::Validation {
                message: format!("validity out of range: {}s", config.validity_seconds),
            })?;

        let secret = config.signing_secret.as_bytes();

        // Expiry is checked by hand so an expired token can be told apart from
        // a forged one.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            issuer: config.issuer.clone(),
            validity,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Validity window applied to every new token
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Signs a new token for `subject`, issued now
    pub fn sign(&self, subject: &str) -> Result<SignedCredential, DomainError> {
        self.sign_at(subject, Utc::now())
    }

    /// Signs a new token for `subject` with an explicit issue instant
    pub fn sign_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<SignedCredential, DomainError> {
        let claims = CredentialClaims::new(subject, &self.issuer, issued_at, self.validity);
        let (Some(iat), Some(exp)) = (claims.issued_at(), claims.expires_at()) else {
            return Err(CredentialError::IssuanceFailed {
                reason: format!("expiry out of range for issue time {}", issued_at),
            }
            .into());
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(
            |e| CredentialError::IssuanceFailed {
                reason: e.to_string(),
            },
        )?;

        Ok(SignedCredential {
            token,
            subject: claims.sub.clone(),
            issued_at: iat,
            expires_at: exp,
        })
    }

    /// Verifies a token against the current time
    pub fn verify(&self, token: &str) -> Verification {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token as of `now`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Verification {
        let claims = match decode::<CredentialClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!("Credential rejected by decoder: {}", e);
                return Verification::Invalid;
            }
        };

        if claims.sub.is_empty() || claims.exp < claims.iat {
            return Verification::Invalid;
        }

        if claims.is_expired_at(now) {
            Verification::Expired(claims)
        } else {
            Verification::Valid(claims)
        }
    }
}
