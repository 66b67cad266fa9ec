//! Business services containing domain logic and use cases.

pub mod credential;

// Re-export commonly used types
pub use credential::{
    token_fingerprint, CredentialReaper, CredentialService, CredentialSigner, SweepResult,
    Verification,
};
