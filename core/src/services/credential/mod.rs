//! Credential service module for QR enrollment tokens
//!
//! This module handles:
//! - Signing and verifying time-bound credential tokens
//! - Issuing credentials with per-subject reuse through the token cache
//! - Validating presented credentials against the cache and the student directory
//! - Periodic eviction of expired cache entries
//! - Rendering credential payloads as QR images

mod reaper;
mod service;
mod signer;
pub mod qr;

#[cfg(test)]
mod tests;

pub use reaper::{CredentialReaper, SweepResult};
pub use service::{token_fingerprint, CredentialService};
pub use signer::{CredentialSigner, Verification};
