//! End-to-end credential lifecycle through the public core API

use std::sync::Arc;

use chrono::{Duration, Utc};

use carnet_core::domain::entities::{CacheEntry, StudentRecord};
use carnet_core::errors::{CredentialError, DomainError};
use carnet_core::repositories::{InMemoryStudentDirectory, InMemoryTokenCache, TokenCache};
use carnet_core::services::{CredentialReaper, CredentialService};
use carnet_shared::CredentialConfig;

fn rejection(result: Result<impl std::fmt::Debug, DomainError>) -> CredentialError {
    match result {
        Err(DomainError::Credential(err)) => err,
        other => panic!("expected credential rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_issue_validate_reissue_lifecycle() {
    let cache = Arc::new(InMemoryTokenCache::new());
    let directory = Arc::new(InMemoryStudentDirectory::with_records(vec![
        StudentRecord::new(1, "S123", "Ana"),
    ]));
    let service = CredentialService::new(
        cache.clone(),
        directory,
        &CredentialConfig::new("integration-secret"),
    )
    .expect("Failed to create credential service");

    // Issue -> T1
    let t1 = service.issue("S123").await.unwrap();
    assert!(!t1.reused);
    assert_eq!(t1.expires_in_seconds, 3600);

    // Validate(T1) -> valid
    let validated = service.validate(&t1.token).await.unwrap();
    assert_eq!(validated.subject, "S123");
    assert!(validated.record.is_enrolled());

    // Issue again immediately -> T1, reused
    let again = service.issue("S123").await.unwrap();
    assert_eq!(again.token, t1.token);
    assert!(again.reused);

    // Force-expire the cached entry
    cache
        .put(CacheEntry::new("S123", t1.token.clone(), Utc::now() - Duration::seconds(1)))
        .await
        .unwrap();

    // Issue -> T2 != T1
    let t2 = service.issue("S123").await.unwrap();
    assert_ne!(t2.token, t1.token);
    assert!(!t2.reused);

    // Validate(T1) -> superseded
    assert_eq!(rejection(service.validate(&t1.token).await), CredentialError::Superseded);

    // Validate(T2) -> valid, also through the scanned payload form
    assert!(service.validate(&t2.token).await.is_ok());
    assert!(service.validate(&service.encode_payload(&t2.token)).await.is_ok());
}

#[tokio::test]
async fn test_reaper_and_service_share_cache() {
    let cache = Arc::new(InMemoryTokenCache::new());
    let directory = Arc::new(InMemoryStudentDirectory::with_records(vec![
        StudentRecord::new(1, "S123", "Ana"),
        StudentRecord::new(2, "S456", "Luis"),
    ]));
    let config = CredentialConfig::new("integration-secret");
    let service = CredentialService::new(cache.clone(), directory, &config).unwrap();
    let reaper = CredentialReaper::from_config(cache.clone(), &config);

    let live = service.issue("S123").await.unwrap();
    service.issue("S456").await.unwrap();
    cache
        .put(CacheEntry::new("S456", "abandoned", Utc::now() - Duration::seconds(1)))
        .await
        .unwrap();

    let result = reaper.run_sweep().await.unwrap();
    assert_eq!(result.removed, 1);

    // Sweeping does not disturb live credentials
    assert!(service.validate(&live.token).await.is_ok());
    assert!(cache.get("S456").await.unwrap().is_none());
}
