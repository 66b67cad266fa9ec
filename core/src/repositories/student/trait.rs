//! Student directory trait defining read access to registrar records.

use async_trait::async_trait;

use crate::domain::entities::student::StudentRecord;
use crate::errors::DomainError;

/// Read-only lookup of students by code
///
/// The directory is owned by the registrar; this service never writes to it.
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    /// Find a student by student code
    ///
    /// # Returns
    /// * `Ok(Some(StudentRecord))` - Student found
    /// * `Ok(None)` - No student with this code
    /// * `Err(DomainError)` - The directory could not be queried
    async fn find_by_student_code(
        &self,
        student_code: &str,
    ) -> Result<Option<StudentRecord>, DomainError>;
}
