pub mod student;
pub mod token_cache;

pub use student::{InMemoryStudentDirectory, StudentDirectory};
pub use token_cache::{InMemoryTokenCache, TokenCache};
