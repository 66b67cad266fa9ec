//! Input validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum accepted length of a student code
pub const MAX_STUDENT_CODE_LENGTH: usize = 32;

static STUDENT_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("student code pattern is valid"));

/// Validates and normalizes a student code
///
/// Surrounding whitespace is trimmed; the remainder must be 1 to 32
/// characters of ASCII letters, digits or hyphens.
///
/// # Returns
/// * `Ok(String)` - The trimmed student code
/// * `Err(String)` - A message describing why the code was rejected
pub fn validate_student_code(code: &str) -> Result<String, String> {
    let trimmed = code.trim();

    if trimmed.is_empty() {
        return Err("student_code must not be empty".to_string());
    }
    if trimmed.len() > MAX_STUDENT_CODE_LENGTH {
        return Err(format!(
            "student_code must be at most {} characters",
            MAX_STUDENT_CODE_LENGTH
        ));
    }
    if !STUDENT_CODE_PATTERN.is_match(trimmed) {
        return Err("student_code may only contain letters, digits and '-'".to_string());
    }

    Ok(trimmed.to_string())
}
