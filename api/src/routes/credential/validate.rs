use actix_web::{web, HttpResponse};
use validator::Validate;

use carnet_core::repositories::{StudentDirectory, TokenCache};

use crate::dto::credential::{ValidateQrRequest, ValidateQrResponse};
use crate::handlers::error::{handle_domain_error, validation_error};

use super::AppState;

/// Handler for POST /api/v1/qr/validate
///
/// Accepts the raw token or the full scanned payload including its marker.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "valid": true, "subject_record": { "student_code": "1151234", ... } }
/// ```
///
/// ## Errors
/// `401` invalid, expired or superseded credential (`details.reissue` tells
/// the client whether requesting a new code helps), `403` not enrolled,
/// `404` unknown student, `503` student directory unavailable.
pub async fn validate<C, D>(
    state: web::Data<AppState<C, D>>,
    request: web::Json<ValidateQrRequest>,
) -> HttpResponse
where
    C: TokenCache + 'static,
    D: StudentDirectory + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error(errors.to_string());
    }

    match state.credential_service.validate(&request.token).await {
        Ok(validated) => {
            log::info!("Credential validated for student {}", validated.subject);
            HttpResponse::Ok().json(ValidateQrResponse::from(validated))
        }
        Err(error) => handle_domain_error(error),
    }
}
