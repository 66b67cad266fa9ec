//! MySQL implementation of the StudentDirectory trait.
//!
//! Reads the registrar's `students` table. The service never writes to it.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};

use carnet_core::domain::entities::{EnrollmentStatus, StudentRecord};
use carnet_core::errors::DomainError;
use carnet_core::repositories::StudentDirectory;

const FIND_BY_CODE: &str = r#"
    SELECT id, student_code, name, last_name, email, career, semester, status
    FROM students
    WHERE student_code = ?
    LIMIT 1
"#;

/// MySQL implementation of StudentDirectory
pub struct MySqlStudentDirectory {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlStudentDirectory {
    /// Create a new MySQL student directory
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to StudentRecord entity
    fn row_to_student(row: &sqlx::mysql::MySqlRow) -> Result<StudentRecord, DomainError> {
        let column = |name: &str, e: sqlx::Error| DomainError::Internal {
            message: format!("Failed to get {}: {}", name, e),
        };

        let semester: Option<i32> = row
            .try_get("semester")
            .map_err(|e| column("semester", e))?;
        let status: String = row.try_get("status").map_err(|e| column("status", e))?;

        Ok(StudentRecord {
            id: row.try_get("id").map_err(|e| column("id", e))?,
            student_code: row
                .try_get("student_code")
                .map_err(|e| column("student_code", e))?,
            name: row.try_get("name").map_err(|e| column("name", e))?,
            last_name: row
                .try_get::<Option<String>, _>("last_name")
                .map_err(|e| column("last_name", e))?
                .unwrap_or_default(),
            email: row
                .try_get::<Option<String>, _>("email")
                .map_err(|e| column("email", e))?
                .unwrap_or_default(),
            career: row
                .try_get::<Option<String>, _>("career")
                .map_err(|e| column("career", e))?
                .unwrap_or_default(),
            semester: semester.and_then(|s| u8::try_from(s).ok()),
            enrollment_status: EnrollmentStatus::parse(&status),
        })
    }
}

#[async_trait]
impl StudentDirectory for MySqlStudentDirectory {
    async fn find_by_student_code(
        &self,
        student_code: &str,
    ) -> Result<Option<StudentRecord>, DomainError> {
        let row = sqlx::query(FIND_BY_CODE)
            .bind(student_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find student: {}", e),
            })?;

        row.as_ref().map(Self::row_to_student).transpose()
    }
}
