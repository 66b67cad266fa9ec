//! Credential issuance and validation

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use carnet_shared::validation::validate_student_code;
use carnet_shared::CredentialConfig;

use crate::domain::entities::credential::{CacheEntry, IssuedCredential, ValidatedCredential};
use crate::errors::{CredentialError, DomainError};
use crate::repositories::{StudentDirectory, TokenCache};

use super::qr;
use super::signer::{CredentialSigner, Verification};

/// Short, log-safe identifier for a token
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(&hasher.finalize()[..6])
}

/// Service issuing and validating QR credentials
///
/// Holds the signer, the shared token cache and the student directory. The
/// cache is shared with [`super::CredentialReaper`], so both hold it behind an `Arc`.
pub struct CredentialService<C: TokenCache, D: StudentDirectory> {
    cache: Arc<C>,
    directory: Arc<D>,
    signer: CredentialSigner,
    namespace_marker: String,
    lookup_timeout: Duration,
}

impl<C: TokenCache, D: StudentDirectory> CredentialService<C, D> {
    /// Creates a new credential service
    ///
    /// # Arguments
    ///
    /// * `cache` - Token cache shared with the reaper
    /// * `directory` - Student directory consulted on validation
    /// * `config` - Credential configuration
    pub fn new(
        cache: Arc<C>,
        directory: Arc<D>,
        config: &CredentialConfig,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            cache,
            directory,
            signer: CredentialSigner::new(config)?,
            namespace_marker: config.namespace_marker.clone(),
            lookup_timeout: config.lookup_timeout(),
        })
    }

    pub fn cache(&self) -> &Arc<C> {
        &self.cache
    }

    pub fn signer(&self) -> &CredentialSigner {
        &self.signer
    }

    /// Prefixes the namespace marker to a token
    pub fn encode_payload(&self, token: &str) -> String {
        format!("{}{}", self.namespace_marker, token)
    }

    /// Removes the exact namespace marker prefix, if present
    pub fn strip_marker<'a>(&self, payload: &'a str) -> &'a str {
        payload
            .strip_prefix(self.namespace_marker.as_str())
            .unwrap_or(payload)
    }

    /// Issues a credential for `subject`
    ///
    /// A still-live cached token is handed out again with `reused = true`.
    /// Otherwise a new token is signed and recorded, replacing any stale entry.
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedCredential)` - QR image, token, remaining seconds and reuse flag
    /// * `Err(DomainError::Validation)` - The subject code is malformed
    /// * `Err(DomainError)` - Signing, rendering or the cache failed
    pub async fn issue(&self, subject: &str) -> Result<IssuedCredential, DomainError> {
        let subject = validate_student_code(subject)
            .map_err(|message| DomainError::Validation { message })?;

        let now = Utc::now();
        let current = self.cache.get(&subject).await?;

        if let Some(entry) = current.as_ref().filter(|entry| entry.is_live_at(now)) {
            debug!(
                subject = %subject,
                token = %token_fingerprint(&entry.token),
                "Reusing cached credential"
            );
            return self.respond(&entry.token, entry.seconds_remaining_at(now), true);
        }

        let signed = self.signer.sign_at(&subject, now)?;
        let entry = CacheEntry::from(&signed);
        let expected = current.as_ref().map(|entry| entry.token.as_str());

        if !self.cache.compare_and_put(expected, entry.clone()).await? {
            // A concurrent issuer recorded its token first; hand that one out
            // instead of returning a token the cache no longer references.
            let now = Utc::now();
            match self.cache.get(&subject).await? {
                Some(winner) if winner.is_live_at(now) => {
                    debug!(subject = %subject, "Adopting concurrently issued credential");
                    return self.respond(&winner.token, winner.seconds_remaining_at(now), true);
                }
                _ => self.cache.put(entry).await?,
            }
        }

        info!(
            subject = %subject,
            token = %token_fingerprint(&signed.token),
            expires_at = %signed.expires_at,
            "Issued new credential"
        );

        self.respond(&signed.token, self.signer.validity().num_seconds(), false)
    }

    /// Validates a presented credential, with or without the namespace marker
    ///
    /// Checks run in order: signature, expiry, cache match, then the
    /// directory lookup. The cache is not locked while the directory is queried.
    ///
    /// # Returns
    ///
    /// * `Ok(ValidatedCredential)` - The subject and its current directory record
    /// * `Err(DomainError::Credential(..))` - The rejection reason
    pub async fn validate(&self, presented: &str) -> Result<ValidatedCredential, DomainError> {
        let token = self.strip_marker(presented.trim());

        let claims = match self.signer.verify(token) {
            Verification::Valid(claims) => claims,
            Verification::Expired(claims) => {
                debug!(subject = %claims.sub, "Rejected expired credential");
                return Err(CredentialError::Expired.into());
            }
            Verification::Invalid => {
                debug!(token = %token_fingerprint(token), "Rejected invalid credential");
                return Err(CredentialError::Invalid.into());
            }
        };

        let is_current = self
            .cache
            .get(&claims.sub)
            .await?
            .map(|entry| constant_time_eq(entry.token.as_bytes(), token.as_bytes()))
            .unwrap_or(false);

        if !is_current {
            debug!(
                subject = %claims.sub,
                token = %token_fingerprint(token),
                "Rejected superseded credential"
            );
            return Err(CredentialError::Superseded.into());
        }

        let lookup = tokio::time::timeout(
            self.lookup_timeout,
            self.directory.find_by_student_code(&claims.sub),
        )
        .await;

        let record = match lookup {
            Ok(Ok(Some(record))) => record,
            Ok(Ok(None)) => return Err(CredentialError::SubjectNotFound.into()),
            Ok(Err(e)) => {
                warn!(subject = %claims.sub, "Student directory lookup failed: {}", e);
                return Err(CredentialError::LookupUnavailable {
                    reason: e.to_string(),
                }
                .into());
            }
            Err(_) => {
                warn!(
                    subject = %claims.sub,
                    "Student directory lookup timed out after {} ms",
                    self.lookup_timeout.as_millis()
                );
                return Err(CredentialError::LookupUnavailable {
                    reason: format!(
                        "lookup timed out after {} ms",
                        self.lookup_timeout.as_millis()
                    ),
                }
                .into());
            }
        };

        if !record.is_enrolled() {
            info!(
                subject = %claims.sub,
                status = %record.enrollment_status,
                "Rejected credential for subject not enrolled"
            );
            return Err(CredentialError::SubjectNotEnrolled.into());
        }

        Ok(ValidatedCredential {
            subject: claims.sub,
            record,
        })
    }

    fn respond(
        &self,
        token: &str,
        expires_in_seconds: i64,
        reused: bool,
    ) -> Result<IssuedCredential, DomainError> {
        let image = qr::render_data_url(&self.encode_payload(token))?;
        Ok(IssuedCredential {
            image,
            token: token.to_string(),
            expires_in_seconds,
            reused,
        })
    }
}
