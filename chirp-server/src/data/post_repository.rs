use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) content: String,
    pub(crate) author_id: String,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    /// Newest first, at most `limit` rows.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Post>, DomainError>;
    /// Newest first, at most `limit` rows written by `author_id`.
    async fn list_by_author(&self, author_id: &str, limit: i64) -> Result<Vec<Post>, DomainError>;
}
