//! MySQL implementations of core repository traits

pub mod student_directory_impl;

pub use student_directory_impl::MySqlStudentDirectory;
