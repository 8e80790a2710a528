//! In-memory repositories and limiters for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::data::post_repository::{NewPost, PostRepository};
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::user::User;
use crate::infrastructure::rate_limit::{RateLimitDecision, RateLimiter};

#[derive(Clone, Default)]
pub(crate) struct FakePostRepo {
    pub(crate) posts: Arc<Mutex<Vec<Post>>>,
    pub(crate) created: Arc<Mutex<Vec<NewPost>>>,
}

impl FakePostRepo {
    pub(crate) fn with_posts(posts: Vec<Post>) -> Self {
        let repo = Self::default();
        *repo.posts.lock().expect("posts mutex poisoned") = posts;
        repo
    }

    pub(crate) fn created_count(&self) -> usize {
        self.created.lock().expect("created mutex poisoned").len()
    }

    fn newest_first(mut posts: Vec<Post>, limit: i64) -> Vec<Post> {
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts.truncate(limit.max(0) as usize);
        posts
    }
}

#[async_trait]
impl PostRepository for FakePostRepo {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        self.created
            .lock()
            .expect("created mutex poisoned")
            .push(input.clone());

        let mut posts = self.posts.lock().expect("posts mutex poisoned");
        let created_at = posts
            .iter()
            .map(|post| post.created_at)
            .max()
            .map(|latest| latest + Duration::seconds(1))
            .unwrap_or_else(Utc::now);
        let post = Post::new(Uuid::new_v4(), input.content, input.author_id, created_at)?;
        posts.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        Ok(self
            .posts
            .lock()
            .expect("posts mutex poisoned")
            .iter()
            .find(|post| post.id == id)
            .cloned())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Post>, DomainError> {
        let posts = self.posts.lock().expect("posts mutex poisoned").clone();
        Ok(Self::newest_first(posts, limit))
    }

    async fn list_by_author(&self, author_id: &str, limit: i64) -> Result<Vec<Post>, DomainError> {
        let posts = self
            .posts
            .lock()
            .expect("posts mutex poisoned")
            .iter()
            .filter(|post| post.author_id == author_id)
            .cloned()
            .collect();
        Ok(Self::newest_first(posts, limit))
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeUserRepo {
    pub(crate) users: Arc<Mutex<Vec<User>>>,
    pub(crate) batch_lookups: Arc<Mutex<Vec<Vec<String>>>>,
}

impl FakeUserRepo {
    pub(crate) fn with_users(users: Vec<User>) -> Self {
        let repo = Self::default();
        *repo.users.lock().expect("users mutex poisoned") = users;
        repo
    }
}

#[async_trait]
impl UserRepository for FakeUserRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .expect("users mutex poisoned")
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[String], limit: i64) -> Result<Vec<User>, DomainError> {
        self.batch_lookups
            .lock()
            .expect("batch_lookups mutex poisoned")
            .push(ids.to_vec());

        Ok(self
            .users
            .lock()
            .expect("users mutex poisoned")
            .iter()
            .filter(|user| ids.contains(&user.id))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .expect("users mutex poisoned")
            .iter()
            .find(|user| user.name.as_deref() == Some(name))
            .cloned())
    }
}

/// Answers every check with the same decision and counts calls.
#[derive(Clone)]
pub(crate) struct FixedRateLimiter {
    decision: RateLimitDecision,
    pub(crate) calls: Arc<Mutex<Vec<String>>>,
}

impl FixedRateLimiter {
    pub(crate) fn allowing() -> Self {
        Self::new(RateLimitDecision::Allowed)
    }

    pub(crate) fn denying() -> Self {
        Self::new(RateLimitDecision::Denied {
            retry_after: std::time::Duration::from_secs(30),
        })
    }

    fn new(decision: RateLimitDecision) -> Self {
        Self {
            decision,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().expect("calls mutex poisoned").len()
    }
}

#[async_trait]
impl RateLimiter for FixedRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitDecision, DomainError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(key.to_string());
        Ok(self.decision)
    }
}

pub(crate) fn sample_user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: Some(name.to_string()),
        image: Some(format!("https://img.example/{name}.png")),
    }
}

pub(crate) fn sample_post(author_id: &str, content: &str, created_at: DateTime<Utc>) -> Post {
    Post::new(Uuid::new_v4(), content, author_id, created_at).expect("sample post must be valid")
}

pub(crate) fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0)
        .single()
        .expect("valid timestamp")
}
