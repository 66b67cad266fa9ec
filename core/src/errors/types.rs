//! Credential error taxonomy
//!
//! Each variant is a distinct outcome the presentation layer reports with its
//! own code, so a scanner UI can tell "rescan a fresh code" apart from
//! "this student's enrollment has lapsed".

use thiserror::Error;

/// Errors produced while issuing or validating QR credentials
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Malformed token or signature mismatch
    #[error("Credential invalid")]
    Invalid,

    /// Well-formed and correctly signed, but past its expiry
    #[error("Credential expired, reissue required")]
    Expired,

    /// Correctly signed and unexpired, but no longer the cached token for its subject
    #[error("Credential superseded, reissue required")]
    Superseded,

    /// The subject exists but is not currently enrolled
    #[error("Subject not enrolled")]
    SubjectNotEnrolled,

    /// The directory has no record for the subject
    #[error("Subject not found")]
    SubjectNotFound,

    /// The directory could not be reached or did not answer in time
    #[error("Student directory unavailable: {reason}")]
    LookupUnavailable { reason: String },

    #[error("Credential issuance failed: {reason}")]
    IssuanceFailed { reason: String },

    #[error("Credential rendering failed: {reason}")]
    RenderFailed { reason: String },
}

impl CredentialError {
    /// Whether the caller can recover by requesting a fresh credential
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CredentialError::Expired | CredentialError::Superseded)
    }
}
