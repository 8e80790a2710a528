use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use super::{RateLimitConfig, RateLimitDecision, RateLimiter};
use crate::domain::error::DomainError;

/// Process-local sliding log. Good for a single server instance and for tests.
pub(crate) struct InMemoryRateLimiter {
    config: RateLimitConfig,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl InMemoryRateLimiter {
    pub(crate) fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            hits: Mutex::new(HashMap::new()),
        }
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<RateLimitDecision, DomainError> {
        let mut hits = self
            .hits
            .lock()
            .map_err(|_| DomainError::Unexpected("rate limiter state poisoned".to_string()))?;

        let window = self.config.window;
        hits.retain(|_, log| {
            while let Some(oldest) = log.front() {
                if now.duration_since(*oldest) >= window {
                    log.pop_front();
                } else {
                    break;
                }
            }
            !log.is_empty()
        });

        let log = hits.entry(key.to_string()).or_default();
        if log.len() >= self.config.max_requests as usize {
            let retry_after = log
                .front()
                .map(|oldest| self.config.window.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(self.config.window);
            return Ok(RateLimitDecision::Denied { retry_after });
        }

        log.push_back(now);
        Ok(RateLimitDecision::Allowed)
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitDecision, DomainError> {
        self.check_at(key, Instant::now())
    }
}
