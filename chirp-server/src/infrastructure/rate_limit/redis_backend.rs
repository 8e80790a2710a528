use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use redis::Script;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use super::{RateLimitConfig, RateLimitDecision, RateLimiter};
use crate::domain::error::DomainError;

const KEY_PREFIX: &str = "chirp:ratelimit";

// Sliding log in a sorted set scored by Redis server time (ms). Prune, count and record
// run as one script so concurrent checks on the same key cannot both take the last slot.
const SLIDING_WINDOW_SCRIPT: &str = r#"
local key = KEYS[1]
local window = tonumber(ARGV[1])
local limit = tonumber(ARGV[2])
local member = ARGV[3]

local t = redis.call('TIME')
local now = tonumber(t[1]) * 1000 + math.floor(tonumber(t[2]) / 1000)

redis.call('ZREMRANGEBYSCORE', key, '-inf', now - window)
local count = redis.call('ZCARD', key)
if count >= limit then
  local oldest = redis.call('ZRANGE', key, 0, 0, 'WITHSCORES')
  local retry = window
  if oldest[2] then
    retry = tonumber(oldest[2]) + window - now
  end
  return {0, retry}
end

redis.call('ZADD', key, now, member)
redis.call('PEXPIRE', key, window)
return {1, 0}
"#;

/// Sliding log shared by every server process that points at the same Redis.
pub(crate) struct RedisRateLimiter {
    config: RateLimitConfig,
    conn: ConnectionManager,
    script: Script,
}

impl RedisRateLimiter {
    pub(crate) async fn connect(url: &str, config: RateLimitConfig) -> anyhow::Result<Self> {
        let client = redis::Client::open(url).context("invalid REDIS_URL")?;
        let conn = ConnectionManager::new(client)
            .await
            .context("failed to connect to redis")?;

        Ok(Self {
            config,
            conn,
            script: Script::new(SLIDING_WINDOW_SCRIPT),
        })
    }
}

fn storage_key(key: &str) -> String {
    format!("{KEY_PREFIX}:{key}")
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitDecision, DomainError> {
        let mut conn = self.conn.clone();
        let window_ms = self.config.window.as_millis() as u64;

        let (allowed, retry_after_ms): (i64, i64) = self
            .script
            .key(storage_key(key))
            .arg(window_ms)
            .arg(self.config.max_requests)
            .arg(Uuid::new_v4().to_string())
            .invoke_async(&mut conn)
            .await
            .map_err(|err| DomainError::Unexpected(format!("rate limiter unavailable: {err}")))?;

        if allowed == 1 {
            return Ok(RateLimitDecision::Allowed);
        }

        Ok(RateLimitDecision::Denied {
            retry_after: Duration::from_millis(retry_after_ms.max(0) as u64),
        })
    }
}
