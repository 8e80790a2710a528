use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Публичная модель поста.
pub struct Post {
    /// Идентификатор поста.
    pub id: Uuid,
    /// Текст поста (1..=280 символов).
    pub content: String,
    /// Идентификатор автора.
    pub author_id: String,
    /// Дата и время публикации (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Публичный профиль автора.
pub struct Author {
    /// Идентификатор пользователя.
    pub id: String,
    /// Имя пользователя (без `@`).
    pub name: String,
    /// URL аватара.
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Пост вместе с профилем автора.
pub struct AuthoredPost {
    /// Пост.
    pub post: Post,
    /// Автор поста.
    pub author: Author,
}
