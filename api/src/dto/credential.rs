use serde::{Deserialize, Serialize};
use validator::Validate;

use carnet_core::domain::entities::{IssuedCredential, StudentRecord, ValidatedCredential};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateQrRequest {
    /// Student code the credential is issued for
    #[serde(alias = "subject_code")]
    #[validate(length(min = 1, max = 32))]
    pub student_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateQrResponse {
    /// `data:image/png;base64,...` URL of the QR code
    pub image: String,
    pub expires_in_seconds: i64,
    pub token: String,
    /// True when a still valid credential was handed out again
    pub reused: bool,
}

impl From<IssuedCredential> for GenerateQrResponse {
    fn from(issued: IssuedCredential) -> Self {
        Self {
            image: issued.image,
            expires_in_seconds: issued.expires_in_seconds,
            token: issued.token,
            reused: issued.reused,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ValidateQrRequest {
    /// Scanned payload, with or without the namespace marker
    #[validate(length(min = 1, max = 4096))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateQrResponse {
    pub valid: bool,
    pub subject_record: StudentRecord,
}

impl From<ValidatedCredential> for ValidateQrResponse {
    fn from(validated: ValidatedCredential) -> Self {
        Self {
            valid: true,
            subject_record: validated.record,
        }
    }
}
