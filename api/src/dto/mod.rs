pub mod credential;

pub use credential::*;
pub use carnet_shared::ErrorResponse;
