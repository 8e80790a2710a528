use std::sync::Arc;

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{Author, require_identifier};

pub(crate) struct ProfileService {
    users: Arc<dyn UserRepository>,
}

impl ProfileService {
    pub(crate) fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Exact, case-sensitive lookup. Callers strip display prefixes such as `@`.
    pub(crate) async fn get_by_username(&self, username: &str) -> Result<Author, DomainError> {
        require_identifier("username", username)?;
        let user = self
            .users
            .find_by_name(username)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user: {username}")))?;

        Author::try_from(user)
    }
}
