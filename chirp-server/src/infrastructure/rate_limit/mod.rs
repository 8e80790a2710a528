use std::time::Duration;

use async_trait::async_trait;

use crate::domain::error::DomainError;

pub(crate) mod memory;
pub(crate) mod redis_backend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RateLimitConfig {
    pub(crate) max_requests: u32,
    pub(crate) window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 3,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RateLimitDecision {
    Allowed,
    /// `retry_after` is the time until the oldest counted hit leaves the window.
    Denied { retry_after: Duration },
}

impl RateLimitDecision {
    #[cfg(test)]
    pub(crate) fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Sliding-window counter keyed by caller identity.
///
/// A call is allowed when fewer than `max_requests` hits for `key` were recorded in the
/// trailing `window`; allowed calls are recorded, denied calls are not.
#[async_trait]
pub(crate) trait RateLimiter: Send + Sync {
    async fn check(&self, key: &str) -> Result<RateLimitDecision, DomainError>;
}
