use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::User;

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_ids(&self, ids: &[String], limit: i64) -> Result<Vec<User>, DomainError>;
    /// Exact, case-sensitive match on the unique `name` column.
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, DomainError>;
}
