use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};

use carnet_core::errors::{CredentialError, DomainError};
use carnet_shared::{error_codes, ErrorResponse};

/// Status and error code reported for each credential rejection
fn credential_status(error: &CredentialError) -> (StatusCode, &'static str) {
    match error {
        CredentialError::Invalid => (StatusCode::UNAUTHORIZED, error_codes::CREDENTIAL_INVALID),
        CredentialError::Expired => (StatusCode::UNAUTHORIZED, error_codes::CREDENTIAL_EXPIRED),
        CredentialError::Superseded => {
            (StatusCode::UNAUTHORIZED, error_codes::CREDENTIAL_SUPERSEDED)
        }
        CredentialError::SubjectNotEnrolled => {
            (StatusCode::FORBIDDEN, error_codes::SUBJECT_NOT_ENROLLED)
        }
        CredentialError::SubjectNotFound => (StatusCode::NOT_FOUND, error_codes::SUBJECT_NOT_FOUND),
        CredentialError::LookupUnavailable { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, error_codes::LOOKUP_UNAVAILABLE)
        }
        CredentialError::IssuanceFailed { .. } | CredentialError::RenderFailed { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
        }
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Credential(credential_error) => {
            let (status, code) = credential_status(&credential_error);

            if status.is_server_error() {
                log::error!("Credential error: {}", credential_error);
                // Internal failure details stay in the log
                let message = match credential_error {
                    CredentialError::LookupUnavailable { .. } => {
                        "Student directory unavailable, try again later"
                    }
                    _ => "An internal error occurred",
                };
                return HttpResponse::build(status).json(ErrorResponse::new(code, message));
            }

            log::info!("Credential rejected: {}", credential_error);
            HttpResponse::build(status).json(
                ErrorResponse::new(code, credential_error.to_string())
                    .add_detail("valid", false)
                    .add_detail("reissue", credential_error.is_recoverable()),
            )
        }
        DomainError::Validation { message } => validation_error(message),
        other => {
            log::error!("Domain Error: {:?}", other);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                "An internal error occurred",
            ))
        }
    }
}

/// 400 response for malformed input
pub fn validation_error(message: impl Into<String>) -> HttpResponse {
    let message = message.into();
    log::warn!("Validation failed: {}", message);
    HttpResponse::BadRequest().json(ErrorResponse::new(error_codes::VALIDATION_ERROR, message))
}

/// Turns JSON extractor failures into the standard error body
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = validation_error(format!("Invalid request body: {}", err));
    actix_web::error::InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_status_mapping() {
        let cases = vec![
            (CredentialError::Invalid, StatusCode::UNAUTHORIZED, "CREDENTIAL_INVALID"),
            (CredentialError::Expired, StatusCode::UNAUTHORIZED, "CREDENTIAL_EXPIRED"),
            (CredentialError::Superseded, StatusCode::UNAUTHORIZED, "CREDENTIAL_SUPERSEDED"),
            (CredentialError::SubjectNotEnrolled, StatusCode::FORBIDDEN, "SUBJECT_NOT_ENROLLED"),
            (CredentialError::SubjectNotFound, StatusCode::NOT_FOUND, "SUBJECT_NOT_FOUND"),
            (
                CredentialError::LookupUnavailable { reason: "timeout".to_string() },
                StatusCode::SERVICE_UNAVAILABLE,
                "LOOKUP_UNAVAILABLE",
            ),
            (
                CredentialError::RenderFailed { reason: "too long".to_string() },
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(credential_status(&error), (status, code));
        }
    }

    #[test]
    fn test_domain_error_status() {
        let response = handle_domain_error(DomainError::Validation {
            message: "bad".to_string(),
        });
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = handle_domain_error(DomainError::Cache {
            message: "down".to_string(),
        });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_domain_error(CredentialError::Expired.into());
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
