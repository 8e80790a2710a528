use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("authentication required")]
    Unauthenticated,

    #[error("rate limit exceeded")]
    RateLimited,

    /// Stored rows violate a relational invariant (e.g. a post whose author is gone).
    #[error("data integrity fault: {0}")]
    IntegrityFault(String),

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}
