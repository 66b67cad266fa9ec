//! CORS middleware configuration for cross-origin requests.
//!
//! The student portal and the scanner app call the API from other origins.
//! Development is permissive; production only admits the configured origins.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use std::env;

use carnet_shared::Environment;

/// Creates a CORS middleware instance configured for the current environment.
///
/// # Environment Variables
/// - `ENVIRONMENT`: Set to "production" for production settings
/// - `ALLOWED_ORIGINS`: Comma-separated list of allowed origins (production only)
/// - `CORS_MAX_AGE`: Max age for preflight cache (default: 3600 seconds)
pub fn create_cors() -> Cors {
    let max_age = env::var("CORS_MAX_AGE")
        .unwrap_or_else(|_| "3600".to_string())
        .parse::<usize>()
        .unwrap_or(3600);

    if Environment::from_env().is_production() {
        create_production_cors(max_age, &allowed_origins())
    } else {
        create_development_cors(max_age)
    }
}

/// Origins listed in `ALLOWED_ORIGINS`
fn allowed_origins() -> Vec<String> {
    env::var("ALLOWED_ORIGINS")
        .map(|origins| parse_origins(&origins))
        .unwrap_or_default()
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn create_development_cors(max_age: usize) -> Cors {
    log::info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .max_age(max_age)
        .supports_credentials()
}

fn create_production_cors(max_age: usize, origins: &[String]) -> Cors {
    log::info!("Configuring CORS for production environment");

    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .max_age(max_age);

    for origin in origins {
        log::info!("Adding allowed origin: {}", origin);
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" https://carnet.ufps.edu.co , ,https://admin.ufps.edu.co"),
            vec![
                "https://carnet.ufps.edu.co".to_string(),
                "https://admin.ufps.edu.co".to_string()
            ]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_create_cors_variants() {
        let _dev = create_development_cors(600);
        let _prod = create_production_cors(600, &["https://carnet.ufps.edu.co".to_string()]);
    }
}
