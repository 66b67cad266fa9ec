//! Redis implementation of the TokenCache trait.
//!
//! Each subject maps to a hash `{prefix}credential:{subject}` holding the
//! token and its expiry. The key is given a native `EXPIREAT` equal to the
//! token's embedded expiry, so Redis evicts entries itself and sweeping is
//! a no-op. Writes go through Lua scripts so the fields and the expiry are
//! applied atomically.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use redis::{AsyncCommands, RedisError, Script};
use std::collections::HashMap;
use tracing::debug;

use carnet_core::domain::entities::CacheEntry;
use carnet_core::errors::DomainError;
use carnet_core::repositories::TokenCache;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

const FIELD_TOKEN: &str = "token";
const FIELD_EXPIRES_AT: &str = "expires_at";

/// KEYS[1] = entry key, ARGV[1] = token, ARGV[2] = expiry (unix seconds)
const PUT_SCRIPT: &str = r#"
redis.call('HSET', KEYS[1], 'token', ARGV[1], 'expires_at', ARGV[2])
redis.call('EXPIREAT', KEYS[1], ARGV[2])
return 1
"#;

/// KEYS[1] = entry key, ARGV[1] = expected token ('' for absent),
/// ARGV[2] = new token, ARGV[3] = expiry (unix seconds)
const COMPARE_AND_PUT_SCRIPT: &str = r#"
local current = redis.call('HGET', KEYS[1], 'token')
if (ARGV[1] == '' and not current) or current == ARGV[1] then
    redis.call('HSET', KEYS[1], 'token', ARGV[2], 'expires_at', ARGV[3])
    redis.call('EXPIREAT', KEYS[1], ARGV[3])
    return 1
end
return 0
"#;

/// Token cache shared by every service instance pointing at the same Redis
#[derive(Clone)]
pub struct RedisTokenCache {
    client: RedisClient,
    put_script: Script,
    compare_and_put_script: Script,
}

impl RedisTokenCache {
    pub fn new(client: RedisClient) -> Self {
        Self {
            client,
            put_script: Script::new(PUT_SCRIPT),
            compare_and_put_script: Script::new(COMPARE_AND_PUT_SCRIPT),
        }
    }

    fn key(&self, subject: &str) -> String {
        entry_key(self.client.key_prefix(), subject)
    }
}

pub(crate) fn entry_key(prefix: &str, subject: &str) -> String {
    format!("{}credential:{}", prefix, subject)
}

/// Decode the fields of a stored hash; an empty or partial hash reads as absent
pub(crate) fn parse_entry(
    subject: &str,
    fields: &HashMap<String, String>,
) -> Result<Option<CacheEntry>, InfrastructureError> {
    let (token, expires_at) = match (fields.get(FIELD_TOKEN), fields.get(FIELD_EXPIRES_AT)) {
        (Some(token), Some(expires_at)) => (token, expires_at),
        _ => return Ok(None),
    };

    let seconds: i64 = expires_at.parse().map_err(|_| {
        InfrastructureError::Serialization(format!("Invalid expires_at '{}'", expires_at))
    })?;

    let expires_at: DateTime<Utc> = Utc.timestamp_opt(seconds, 0).single().ok_or_else(|| {
        InfrastructureError::Serialization(format!("Out of range expires_at {}", seconds))
    })?;

    Ok(Some(CacheEntry::new(subject, token.clone(), expires_at)))
}

fn cache_error(e: RedisError) -> DomainError {
    InfrastructureError::Cache(e).into()
}

#[async_trait]
impl TokenCache for RedisTokenCache {
    async fn get(&self, subject: &str) -> Result<Option<CacheEntry>, DomainError> {
        let mut conn = self.client.connection();
        let fields: HashMap<String, String> = redis::cmd("HGETALL")
            .arg(self.key(subject))
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;

        Ok(parse_entry(subject, &fields)?)
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError> {
        let mut conn = self.client.connection();
        let _: i32 = self
            .put_script
            .key(self.key(&entry.subject))
            .arg(&entry.token)
            .arg(entry.expires_at.timestamp())
            .invoke_async(&mut conn)
            .await
            .map_err(cache_error)?;

        debug!(subject = %entry.subject, "Stored credential in Redis");
        Ok(())
    }

    async fn compare_and_put(
        &self,
        expected_token: Option<&str>,
        entry: CacheEntry,
    ) -> Result<bool, DomainError> {
        let mut conn = self.client.connection();
        let written: i32 = self
            .compare_and_put_script
            .key(self.key(&entry.subject))
            .arg(expected_token.unwrap_or(""))
            .arg(&entry.token)
            .arg(entry.expires_at.timestamp())
            .invoke_async(&mut conn)
            .await
            .map_err(cache_error)?;

        Ok(written == 1)
    }

    async fn remove(&self, subject: &str) -> Result<bool, DomainError> {
        let mut conn = self.client.connection();
        let deleted: i64 = conn.del(self.key(subject)).await.map_err(cache_error)?;
        Ok(deleted > 0)
    }

    async fn sweep_expired(&self, _now: DateTime<Utc>) -> Result<usize, DomainError> {
        // Keys carry EXPIREAT; Redis has already dropped anything expired.
        Ok(0)
    }

    async fn len(&self) -> Result<usize, DomainError> {
        let mut conn = self.client.connection();
        let pattern = entry_key(self.client.key_prefix(), "*");
        let mut iter = conn
            .scan_match::<_, String>(pattern)
            .await
            .map_err(cache_error)?;

        let mut count = 0;
        while iter.next_item().await.is_some() {
            count += 1;
        }
        Ok(count)
    }
}
