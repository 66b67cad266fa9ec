//! Student record as supplied by the external student directory.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Enrollment status reported by the registrar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    /// Currently enrolled
    Enrolled,
    /// Known to the registrar but not enrolled this term
    NotEnrolled,
    /// A status string this service does not recognise
    Unknown(String),
}

impl EnrollmentStatus {
    /// Parses a registrar status string
    ///
    /// Matching is case-insensitive and accepts the Spanish labels used by the
    /// university registrar.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "enrolled" | "active" | "activo" | "matriculado" => EnrollmentStatus::Enrolled,
            "not_enrolled" | "inactive" | "inactivo" | "retirado" | "egresado"
            | "no matriculado" | "suspendido" => EnrollmentStatus::NotEnrolled,
            _ => EnrollmentStatus::Unknown(raw.to_string()),
        }
    }

    /// Only an explicit enrolled status passes validation
    pub fn is_enrolled(&self) -> bool {
        matches!(self, EnrollmentStatus::Enrolled)
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrollmentStatus::Enrolled => write!(f, "enrolled"),
            EnrollmentStatus::NotEnrolled => write!(f, "not_enrolled"),
            EnrollmentStatus::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// A student as known to the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Directory primary key
    pub id: i64,

    /// Student code, the subject identifier carried by credentials
    pub student_code: String,

    pub name: String,

    pub last_name: String,

    pub email: String,

    /// Academic program
    pub career: String,

    /// Current semester, when the registrar reports one
    pub semester: Option<u8>,

    pub enrollment_status: EnrollmentStatus,
}

impl StudentRecord {
    /// Creates an enrolled student record with placeholder contact data
    pub fn new(id: i64, student_code: impl Into<String>, name: impl Into<String>) -> Self {
        let student_code = student_code.into();
        Self {
            id,
            email: format!("{}@ufps.edu.co", student_code.to_lowercase()),
            student_code,
            name: name.into(),
            last_name: String::new(),
            career: String::new(),
            semester: None,
            enrollment_status: EnrollmentStatus::Enrolled,
        }
    }

    /// Sets the enrollment status
    pub fn with_status(mut self, status: EnrollmentStatus) -> Self {
        self.enrollment_status = status;
        self
    }

    pub fn is_enrolled(&self) -> bool {
        self.enrollment_status.is_enrolled()
    }
}
