//! # UFPS Carnet Core
//!
//! Core business logic for the student QR credential service.
//! This crate contains domain entities, the credential services, repository
//! interfaces with in-memory implementations, and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
