//! In-memory student directory for local runs and tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::student::StudentRecord;
use crate::errors::DomainError;

use super::r#trait::StudentDirectory;

#[derive(Clone, Default)]
pub struct InMemoryStudentDirectory {
    students: Arc<RwLock<HashMap<String, StudentRecord>>>,
}

impl InMemoryStudentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory pre-populated with `records`
    pub fn with_records(records: impl IntoIterator<Item = StudentRecord>) -> Self {
        let students = records
            .into_iter()
            .map(|record| (record.student_code.clone(), record))
            .collect();
        Self {
            students: Arc::new(RwLock::new(students)),
        }
    }

    /// Insert or replace a record keyed by its student code
    pub async fn insert(&self, record: StudentRecord) {
        let mut students = self.students.write().await;
        students.insert(record.student_code.clone(), record);
    }

    pub async fn remove(&self, student_code: &str) -> Option<StudentRecord> {
        self.students.write().await.remove(student_code)
    }
}

#[async_trait]
impl StudentDirectory for InMemoryStudentDirectory {
    async fn find_by_student_code(
        &self,
        student_code: &str,
    ) -> Result<Option<StudentRecord>, DomainError> {
        let students = self.students.read().await;
        Ok(students.get(student_code).cloned())
    }
}
