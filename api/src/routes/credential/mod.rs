//! QR credential route handlers
//!
//! - `POST /api/v1/qr/generate` issues (or re-serves) a student's credential
//! - `POST /api/v1/qr/validate` checks a scanned credential

pub mod generate;
pub mod validate;

use std::sync::Arc;

use carnet_core::repositories::{StudentDirectory, TokenCache};
use carnet_core::services::CredentialService;

pub use generate::generate;
pub use validate::validate;

/// Application state that holds shared services
pub struct AppState<C, D>
where
    C: TokenCache,
    D: StudentDirectory,
{
    pub credential_service: Arc<CredentialService<C, D>>,
}

impl<C, D> AppState<C, D>
where
    C: TokenCache,
    D: StudentDirectory,
{
    pub fn new(credential_service: Arc<CredentialService<C, D>>) -> Self {
        Self { credential_service }
    }
}
