use actix_web::{web, HttpResponse};
use validator::Validate;

use carnet_core::repositories::{StudentDirectory, TokenCache};
use carnet_shared::validation::validate_student_code;

use crate::dto::credential::{GenerateQrRequest, GenerateQrResponse};
use crate::handlers::error::{handle_domain_error, validation_error};

use super::AppState;

/// Handler for POST /api/v1/qr/generate
///
/// # Request Body
///
/// ```json
/// { "student_code": "1151234" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "image": "data:image/png;base64,iVBORw0KGgo...",
///     "expires_in_seconds": 3600,
///     "token": "eyJ0eXAiOiJKV1Qi...",
///     "reused": false
/// }
/// ```
pub async fn generate<C, D>(
    state: web::Data<AppState<C, D>>,
    request: web::Json<GenerateQrRequest>,
) -> HttpResponse
where
    C: TokenCache + 'static,
    D: StudentDirectory + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error(errors.to_string());
    }

    let student_code = match validate_student_code(&request.student_code) {
        Ok(code) => code,
        Err(message) => return validation_error(message),
    };

    log::info!("Processing QR generation for student {}", student_code);

    match state.credential_service.issue(&student_code).await {
        Ok(issued) => HttpResponse::Ok().json(GenerateQrResponse::from(issued)),
        Err(error) => handle_domain_error(error),
    }
}
