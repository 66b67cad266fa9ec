//! Domain entities representing core business objects.

pub mod credential;
pub mod student;


// Re-export commonly used types
pub use credential::{
    CacheEntry, CredentialClaims, IssuedCredential, SignedCredential, ValidatedCredential,
};
pub use student::{EnrollmentStatus, StudentRecord};
