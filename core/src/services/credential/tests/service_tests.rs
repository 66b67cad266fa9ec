//! Unit tests for credential issuance and validation

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use carnet_shared::CredentialConfig;

use crate::domain::entities::credential::CacheEntry;
use crate::domain::entities::student::{EnrollmentStatus, StudentRecord};
use crate::errors::{CredentialError, DomainError};
use crate::repositories::{InMemoryStudentDirectory, InMemoryTokenCache, StudentDirectory, TokenCache};
use crate::services::credential::{qr, token_fingerprint, CredentialService};

type TestService = CredentialService<InMemoryTokenCache, InMemoryStudentDirectory>;

/// Directory that always fails
struct UnreachableDirectory;

#[async_trait]
impl StudentDirectory for UnreachableDirectory {
    async fn find_by_student_code(&self, _code: &str) -> Result<Option<StudentRecord>, DomainError> {
        Err(DomainError::Internal {
            message: "connection refused".to_string(),
        })
    }
}

/// Directory that answers after a fixed delay
struct SlowDirectory {
    delay: StdDuration,
}

#[async_trait]
impl StudentDirectory for SlowDirectory {
    async fn find_by_student_code(&self, code: &str) -> Result<Option<StudentRecord>, DomainError> {
        tokio::time::sleep(self.delay).await;
        Ok(Some(StudentRecord::new(1, code, "Slow")))
    }
}

fn test_config() -> CredentialConfig {
    CredentialConfig::new("test-signing-secret")
}

fn create_test_service() -> TestService {
    let directory = InMemoryStudentDirectory::with_records(vec![
        StudentRecord::new(1, "S123", "Ana"),
        StudentRecord::new(2, "S456", "Luis").with_status(EnrollmentStatus::NotEnrolled),
        StudentRecord::new(3, "S789", "Marta")
            .with_status(EnrollmentStatus::Unknown("graduado".to_string())),
    ]);
    CredentialService::new(
        Arc::new(InMemoryTokenCache::new()),
        Arc::new(directory),
        &test_config(),
    )
    .unwrap()
}

fn credential_error(err: DomainError) -> CredentialError {
    match err {
        DomainError::Credential(e) => e,
        other => panic!("expected credential error, got {:?}", other),
    }
}

/// Replace the cached entry with one that has already expired
async fn force_expire(service: &TestService, subject: &str) {
    let entry = service.cache().get(subject).await.unwrap().unwrap();
    service
        .cache()
        .put(CacheEntry::new(subject, entry.token, Utc::now() - Duration::seconds(1)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_issue_new_credential() {
    let service = create_test_service();

    let issued = service.issue("S123").await.unwrap();

    assert!(!issued.reused);
    assert_eq!(issued.expires_in_seconds, 3600);
    assert!(issued.image.starts_with("data:image/png;base64,"));

    let cached = service.cache().get("S123").await.unwrap().unwrap();
    assert_eq!(cached.token, issued.token);
}

#[tokio::test]
async fn test_issued_image_encodes_marked_token() {
    let service = create_test_service();

    let issued = service.issue("S123").await.unwrap();

    let expected = qr::render_data_url(&format!("UFPSCARNET:{}", issued.token)).unwrap();
    assert_eq!(issued.image, expected);
    assert_ne!(issued.image, qr::render_data_url(&issued.token).unwrap());

    let reused = service.issue("S123").await.unwrap();
    assert!(reused.reused);
    assert_eq!(reused.image, expected);
}

#[test]
fn test_out_of_range_validity_is_rejected_at_construction() {
    let result = CredentialService::new(
        Arc::new(InMemoryTokenCache::new()),
        Arc::new(InMemoryStudentDirectory::new()),
        &test_config().with_validity_seconds(100_000_000_000_000),
    );

    assert!(matches!(result, Err(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_issue_reuses_live_credential() {
    let service = create_test_service();

    let first = service.issue("S123").await.unwrap();
    let second = service.issue("S123").await.unwrap();

    assert_eq!(first.token, second.token);
    assert!(second.reused);
    assert!(second.expires_in_seconds <= 3600);
    assert!(second.expires_in_seconds >= 3598);
}

#[tokio::test]
async fn test_issue_after_expiry_mints_new_token() {
    let service = create_test_service();

    let first = service.issue("S123").await.unwrap();
    force_expire(&service, "S123").await;
    let second = service.issue("S123").await.unwrap();

    assert_ne!(first.token, second.token);
    assert!(!second.reused);
    assert_eq!(second.expires_in_seconds, 3600);
}

#[tokio::test]
async fn test_issue_trims_and_validates_subject() {
    let service = create_test_service();

    let issued = service.issue("  S123  ").await.unwrap();
    assert!(service.cache().get("S123").await.unwrap().is_some());
    assert!(!issued.reused);

    assert!(matches!(
        service.issue("   ").await,
        Err(DomainError::Validation { .. })
    ));
    assert!(matches!(
        service.issue("S1 23").await,
        Err(DomainError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_validate_current_credential() {
    let service = create_test_service();
    let issued = service.issue("S123").await.unwrap();

    let validated = service.validate(&issued.token).await.unwrap();

    assert_eq!(validated.subject, "S123");
    assert_eq!(validated.record.name, "Ana");
}

#[tokio::test]
async fn test_validate_accepts_marked_payload() {
    let service = create_test_service();
    let issued = service.issue("S123").await.unwrap();

    let payload = service.encode_payload(&issued.token);
    assert!(payload.starts_with("UFPSCARNET:"));

    let validated = service.validate(&payload).await.unwrap();
    assert_eq!(validated.subject, "S123");
}

#[tokio::test]
async fn test_strip_marker_requires_exact_prefix() {
    let service = create_test_service();

    assert_eq!(service.strip_marker("UFPSCARNET:abc"), "abc");
    assert_eq!(service.strip_marker("abc"), "abc");
    assert_eq!(service.strip_marker("ufpscarnet:abc"), "ufpscarnet:abc");
    assert_eq!(service.strip_marker("XUFPSCARNET:abc"), "XUFPSCARNET:abc");
}

#[tokio::test]
async fn test_validate_rejects_invalid_token() {
    let service = create_test_service();

    let err = service.validate("UFPSCARNET:garbage").await.unwrap_err();
    assert_eq!(credential_error(err), CredentialError::Invalid);
}

#[tokio::test]
async fn test_validate_rejects_expired_token() {
    let service = create_test_service();
    let signed = service
        .signer()
        .sign_at("S123", Utc::now() - Duration::hours(2))
        .unwrap();
    service.cache().put(CacheEntry::from(&signed)).await.unwrap();

    let err = service.validate(&signed.token).await.unwrap_err();
    let err = credential_error(err);

    assert_eq!(err, CredentialError::Expired);
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_validate_rejects_superseded_token() {
    let service = create_test_service();

    let first = service.issue("S123").await.unwrap();
    force_expire(&service, "S123").await;
    service.issue("S123").await.unwrap();

    // Still correctly signed and inside its own window
    assert!(service.signer().verify(&first.token).claims().is_some());

    let err = credential_error(service.validate(&first.token).await.unwrap_err());
    assert_eq!(err, CredentialError::Superseded);
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_validate_rejects_uncached_token() {
    let service = create_test_service();
    let signed = service.signer().sign("S123").unwrap();

    let err = credential_error(service.validate(&signed.token).await.unwrap_err());
    assert_eq!(err, CredentialError::Superseded);
}

#[tokio::test]
async fn test_validate_rejects_subject_not_enrolled() {
    let service = create_test_service();

    for subject in ["S456", "S789"] {
        let issued = service.issue(subject).await.unwrap();
        let err = credential_error(service.validate(&issued.token).await.unwrap_err());
        assert_eq!(err, CredentialError::SubjectNotEnrolled);
        assert!(!err.is_recoverable());
    }
}

#[tokio::test]
async fn test_validate_rejects_unknown_subject() {
    let service = create_test_service();
    let issued = service.issue("S000").await.unwrap();

    let err = credential_error(service.validate(&issued.token).await.unwrap_err());
    assert_eq!(err, CredentialError::SubjectNotFound);
}

#[tokio::test]
async fn test_validate_reports_unreachable_directory() {
    let service = CredentialService::new(
        Arc::new(InMemoryTokenCache::new()),
        Arc::new(UnreachableDirectory),
        &test_config(),
    )
    .unwrap();
    let issued = service.issue("S123").await.unwrap();

    let err = credential_error(service.validate(&issued.token).await.unwrap_err());
    assert!(matches!(err, CredentialError::LookupUnavailable { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_validate_times_out_slow_directory() {
    let config = test_config().with_lookup_timeout_ms(100);
    let service = CredentialService::new(
        Arc::new(InMemoryTokenCache::new()),
        Arc::new(SlowDirectory {
            delay: StdDuration::from_secs(5),
        }),
        &config,
    )
    .unwrap();
    let issued = service.issue("S123").await.unwrap();

    let err = credential_error(service.validate(&issued.token).await.unwrap_err());
    assert!(matches!(err, CredentialError::LookupUnavailable { .. }));
}

#[tokio::test]
async fn test_superseded_check_skips_directory() {
    // A failing directory would turn a superseded token into LookupUnavailable
    // if the lookup ran first.
    let service = CredentialService::new(
        Arc::new(InMemoryTokenCache::new()),
        Arc::new(UnreachableDirectory),
        &test_config(),
    )
    .unwrap();
    let signed = service.signer().sign("S123").unwrap();

    let err = credential_error(service.validate(&signed.token).await.unwrap_err());
    assert_eq!(err, CredentialError::Superseded);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_issue_records_one_returned_token() {
    let service = Arc::new(create_test_service());

    // Start from a stale entry so every caller races to replace it
    service
        .cache()
        .put(CacheEntry::new("S123", "stale-token", Utc::now() - Duration::seconds(5)))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let service = service.clone();
        handles.push(tokio::spawn(async move { service.issue("S123").await.unwrap() }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    let cached = service.cache().get("S123").await.unwrap().unwrap();
    let tokens: HashSet<_> = results.iter().map(|r| r.token.clone()).collect();

    assert_eq!(tokens.len(), 1);
    assert!(tokens.contains(&cached.token));
    assert_eq!(results.iter().filter(|r| !r.reused).count(), 1);
    assert!(service.validate(&cached.token).await.is_ok());
}

#[test]
fn test_token_fingerprint() {
    let fingerprint = token_fingerprint("abc");

    assert_eq!(fingerprint.len(), 12);
    assert_eq!(fingerprint, token_fingerprint("abc"));
    assert_ne!(fingerprint, token_fingerprint("abd"));
    assert!(!fingerprint.contains("abc"));
}
