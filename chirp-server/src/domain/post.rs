use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateLength;

use super::error::DomainError;
use super::user::Author;

pub(crate) const MIN_CONTENT_CHARS: u64 = 1;
pub(crate) const MAX_CONTENT_CHARS: u64 = 280;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: Uuid,
    pub(crate) content: String,
    pub(crate) author_id: String,
    pub(crate) created_at: DateTime<Utc>,
}

/// A post paired with the public projection of its author, built at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct AuthoredPost {
    pub(crate) post: Post,
    pub(crate) author: Author,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) content: String,
}

impl CreatePostRequest {
    /// Content is kept byte-for-byte; only its length is checked.
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        check_content_length(&self.content)?;
        Ok(self)
    }
}

impl Post {
    pub(crate) fn new(
        id: Uuid,
        content: impl Into<String>,
        author_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let content = content.into();
        check_content_length(&content)?;

        let author_id = author_id.into();
        if author_id.trim().is_empty() {
            return Err(DomainError::Validation {
                field: "author_id",
                message: "must not be empty",
            });
        }

        Ok(Self {
            id,
            content,
            author_id,
            created_at,
        })
    }
}

/// Length is counted in characters, not bytes.
pub(crate) fn check_content_length(content: &str) -> Result<(), DomainError> {
    if !content.validate_length(Some(MIN_CONTENT_CHARS), None, None) {
        return Err(DomainError::Validation {
            field: "content",
            message: "must be at least 1 character",
        });
    }
    if !content.validate_length(None, Some(MAX_CONTENT_CHARS), None) {
        return Err(DomainError::Validation {
            field: "content",
            message: "must be at most 280 characters",
        });
    }
    Ok(())
}

/// Parses a public post identifier. Anything that is not a UUID cannot name a stored post.
pub(crate) fn parse_post_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::NotFound(format!("post id: {raw}")))
}
