use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{info, warn};

use crate::data::post_repository::{NewPost, PostRepository};
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{AuthoredPost, CreatePostRequest, Post, parse_post_id};
use crate::domain::user::{Author, User, require_identifier};
use crate::infrastructure::rate_limit::{RateLimitDecision, RateLimiter};

pub(crate) const FEED_LIMIT: i64 = 100;

/// Caller identity resolved by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Actor {
    pub(crate) user_id: String,
}

pub(crate) struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    limiter: Arc<dyn RateLimiter>,
}

impl PostService {
    pub(crate) fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            posts,
            users,
            limiter,
        }
    }

    pub(crate) async fn list_all(&self) -> Result<Vec<AuthoredPost>, DomainError> {
        let posts = self.posts.list_recent(FEED_LIMIT).await?;
        self.attach_authors(posts).await
    }

    pub(crate) async fn list_by_author(
        &self,
        user_id: &str,
    ) -> Result<Vec<AuthoredPost>, DomainError> {
        require_identifier("user_id", user_id)?;
        let posts = self.posts.list_by_author(user_id, FEED_LIMIT).await?;
        self.attach_authors(posts).await
    }

    pub(crate) async fn get_by_id(&self, post_id: &str) -> Result<AuthoredPost, DomainError> {
        let id = parse_post_id(post_id)?;
        let post = self
            .posts
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;

        let user = self.users.find_by_id(&post.author_id).await?;
        let author = resolve_author(&post, user)?;
        Ok(AuthoredPost { post, author })
    }

    pub(crate) async fn create(
        &self,
        actor: Option<&Actor>,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let actor = actor
            .filter(|actor| !actor.user_id.trim().is_empty())
            .ok_or(DomainError::Unauthenticated)?;
        let req = req.validate()?;

        // Check-then-write is not atomic; a burst racing the window edge may slip one extra post.
        if let RateLimitDecision::Denied { retry_after } = self.limiter.check(&actor.user_id).await? {
            warn!(
                user_id = %actor.user_id,
                retry_after_secs = retry_after.as_secs(),
                "post rate limit exceeded"
            );
            return Err(DomainError::RateLimited);
        }

        let post = self
            .posts
            .create_post(NewPost {
                content: req.content,
                author_id: actor.user_id.clone(),
            })
            .await?;

        info!(post_id = %post.id, user_id = %post.author_id, "post created");
        Ok(post)
    }

    async fn attach_authors(&self, posts: Vec<Post>) -> Result<Vec<AuthoredPost>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let author_ids: Vec<String> = posts
            .iter()
            .map(|post| post.author_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let users: HashMap<String, User> = self
            .users
            .find_by_ids(&author_ids, FEED_LIMIT)
            .await?
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();

        posts
            .into_iter()
            .map(|post| {
                let user = users.get(&post.author_id).cloned();
                let author = resolve_author(&post, user)?;
                Ok(AuthoredPost { post, author })
            })
            .collect::<Result<Vec<_>, DomainError>>()
    }
}

fn resolve_author(post: &Post, user: Option<User>) -> Result<Author, DomainError> {
    let user = user.ok_or_else(|| {
        DomainError::IntegrityFault(format!(
            "could not find author {} for post {}",
            post.author_id, post.id
        ))
    })?;
    Author::try_from(user)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use uuid::Uuid;

    use super::{Actor, FEED_LIMIT, PostService};
    use crate::data::testing::{
        FakePostRepo, FakeUserRepo, FixedRateLimiter, at, sample_post, sample_user,
    };
    use crate::domain::error::DomainError;
    use crate::domain::post::CreatePostRequest;
    use crate::domain::user::User;
    use crate::infrastructure::rate_limit::RateLimitConfig;
    use crate::infrastructure::rate_limit::memory::InMemoryRateLimiter;

    fn service(posts: FakePostRepo, users: FakeUserRepo, limiter: FixedRateLimiter) -> PostService {
        PostService::new(Arc::new(posts), Arc::new(users), Arc::new(limiter))
    }

    fn actor(user_id: &str) -> Actor {
        Actor {
            user_id: user_id.to_string(),
        }
    }

    fn content(text: &str) -> CreatePostRequest {
        CreatePostRequest {
            content: text.to_string(),
        }
    }

    #[tokio::test]
    async fn list_all_joins_authors_newest_first() {
        let posts = FakePostRepo::with_posts(vec![
            sample_post("u1", "first", at(1)),
            sample_post("u2", "second", at(2)),
            sample_post("u1", "third", at(3)),
        ]);
        let users = FakeUserRepo::with_users(vec![sample_user("u1", "alice"), sample_user("u2", "bob")]);
        let service = service(posts, users.clone(), FixedRateLimiter::allowing());

        let feed = service.list_all().await.expect("list_all must succeed");

        let contents: Vec<_> = feed.iter().map(|item| item.post.content.as_str()).collect();
        assert_eq!(contents, vec!["third", "second", "first"]);
        assert_eq!(feed[0].author.name, "alice");
        assert_eq!(feed[1].author.name, "bob");
        assert!(feed.windows(2).all(|w| w[0].post.created_at >= w[1].post.created_at));

        let lookups = users.batch_lookups.lock().expect("lookups mutex poisoned");
        assert_eq!(lookups.len(), 1);
        assert_eq!(lookups[0], vec!["u1".to_string(), "u2".to_string()]);
    }

    #[tokio::test]
    async fn list_all_caps_at_feed_limit() {
        let posts = (0..150)
            .map(|i| sample_post("u1", &format!("post {i}"), at(i)))
            .collect();
        let service = service(
            FakePostRepo::with_posts(posts),
            FakeUserRepo::with_users(vec![sample_user("u1", "alice")]),
            FixedRateLimiter::allowing(),
        );

        let feed = service.list_all().await.expect("list_all must succeed");
        assert_eq!(feed.len(), FEED_LIMIT as usize);
        assert_eq!(feed[0].post.content, "post 149");
    }

    #[tokio::test]
    async fn list_all_on_empty_store_skips_user_lookup() {
        let users = FakeUserRepo::default();
        let service = service(FakePostRepo::default(), users.clone(), FixedRateLimiter::allowing());

        let feed = service.list_all().await.expect("list_all must succeed");
        assert!(feed.is_empty());
        assert!(users.batch_lookups.lock().expect("lookups mutex poisoned").is_empty());
    }

    #[tokio::test]
    async fn list_all_fails_when_author_is_missing() {
        let service = service(
            FakePostRepo::with_posts(vec![
                sample_post("u1", "ok", at(1)),
                sample_post("ghost", "orphan", at(2)),
            ]),
            FakeUserRepo::with_users(vec![sample_user("u1", "alice")]),
            FixedRateLimiter::allowing(),
        );

        let err = service.list_all().await.expect_err("orphan post must fail the feed");
        assert!(matches!(err, DomainError::IntegrityFault(_)));
    }

    #[tokio::test]
    async fn list_all_fails_when_author_has_no_image() {
        let service = service(
            FakePostRepo::with_posts(vec![sample_post("u1", "hello", at(1))]),
            FakeUserRepo::with_users(vec![User {
                id: "u1".to_string(),
                name: Some("alice".to_string()),
                image: None,
            }]),
            FixedRateLimiter::allowing(),
        );

        let err = service.list_all().await.expect_err("incomplete author must fail");
        assert!(matches!(err, DomainError::IntegrityFault(_)));
    }

    #[tokio::test]
    async fn list_by_author_filters_posts() {
        let service = service(
            FakePostRepo::with_posts(vec![
                sample_post("u1", "mine", at(1)),
                sample_post("u2", "theirs", at(2)),
                sample_post("u1", "mine again", at(3)),
            ]),
            FakeUserRepo::with_users(vec![sample_user("u1", "alice"), sample_user("u2", "bob")]),
            FixedRateLimiter::allowing(),
        );

        let posts = service.list_by_author("u1").await.expect("must succeed");
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|item| item.author.id == "u1"));
        assert_eq!(posts[0].post.content, "mine again");
    }

    #[tokio::test]
    async fn list_by_author_caps_at_feed_limit_newest_first() {
        let posts = (0..150)
            .map(|i| sample_post("u1", &format!("post {i}"), at(i)))
            .chain(std::iter::once(sample_post("u2", "other", at(500))))
            .collect();
        let service = service(
            FakePostRepo::with_posts(posts),
            FakeUserRepo::with_users(vec![sample_user("u1", "alice"), sample_user("u2", "bob")]),
            FixedRateLimiter::allowing(),
        );

        let posts = service.list_by_author("u1").await.expect("must succeed");
        assert_eq!(posts.len(), FEED_LIMIT as usize);
        assert_eq!(posts[0].post.content, "post 149");
        assert_eq!(posts[99].post.content, "post 50");
        assert!(posts.windows(2).all(|w| w[0].post.created_at >= w[1].post.created_at));
        assert!(posts.iter().all(|item| item.post.author_id == "u1"));
    }

    #[tokio::test]
    async fn list_by_author_fails_when_author_has_no_image() {
        let service = service(
            FakePostRepo::with_posts(vec![
                sample_post("u1", "first", at(1)),
                sample_post("u1", "second", at(2)),
            ]),
            FakeUserRepo::with_users(vec![User {
                id: "u1".to_string(),
                name: Some("alice".to_string()),
                image: None,
            }]),
            FixedRateLimiter::allowing(),
        );

        let err = service
            .list_by_author("u1")
            .await
            .expect_err("incomplete author must fail");
        assert!(matches!(err, DomainError::IntegrityFault(_)));
    }

    #[tokio::test]
    async fn list_by_unknown_author_is_empty() {
        let service = service(
            FakePostRepo::with_posts(vec![sample_post("u1", "hello", at(1))]),
            FakeUserRepo::with_users(vec![sample_user("u1", "alice")]),
            FixedRateLimiter::allowing(),
        );

        let posts = service.list_by_author("nobody").await.expect("must succeed");
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn list_by_blank_author_is_a_validation_error() {
        let service = service(
            FakePostRepo::default(),
            FakeUserRepo::default(),
            FixedRateLimiter::allowing(),
        );

        let err = service.list_by_author("  ").await.expect_err("blank id must fail");
        assert!(matches!(err, DomainError::Validation { field: "user_id", .. }));
    }

    #[tokio::test]
    async fn get_by_id_returns_post_with_author() {
        let post = sample_post("u1", "hello", at(1));
        let id = post.id;
        let service = service(
            FakePostRepo::with_posts(vec![post]),
            FakeUserRepo::with_users(vec![sample_user("u1", "alice")]),
            FixedRateLimiter::allowing(),
        );

        let found = service.get_by_id(&id.to_string()).await.expect("must be found");
        assert_eq!(found.post.id, id);
        assert_eq!(found.author.name, "alice");
    }

    #[tokio::test]
    async fn get_by_id_missing_is_not_found() {
        let service = service(
            FakePostRepo::default(),
            FakeUserRepo::default(),
            FixedRateLimiter::allowing(),
        );

        let err = service
            .get_by_id(&Uuid::new_v4().to_string())
            .await
            .expect_err("must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = service.get_by_id("definitely-not-a-uuid").await.expect_err("must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_by_id_with_orphaned_author_is_an_integrity_fault() {
        let post = sample_post("ghost", "hello", at(1));
        let id = post.id;
        let service = service(
            FakePostRepo::with_posts(vec![post]),
            FakeUserRepo::default(),
            FixedRateLimiter::allowing(),
        );

        let err = service.get_by_id(&id.to_string()).await.expect_err("must fail");
        assert!(matches!(err, DomainError::IntegrityFault(_)));
    }

    #[tokio::test]
    async fn create_persists_content_verbatim() {
        let posts = FakePostRepo::default();
        let limiter = FixedRateLimiter::allowing();
        let service = service(posts.clone(), FakeUserRepo::default(), limiter.clone());

        let created = service
            .create(Some(&actor("u1")), content("  hello, world 🦀 "))
            .await
            .expect("create must succeed");

        assert_eq!(created.content, "  hello, world 🦀 ");
        assert_eq!(created.author_id, "u1");
        assert_eq!(posts.created_count(), 1);
        assert_eq!(
            limiter.calls.lock().expect("calls mutex poisoned").as_slice(),
            ["u1".to_string()]
        );
    }

    #[tokio::test]
    async fn create_then_get_by_id_round_trips() {
        let posts = FakePostRepo::default();
        let service = service(
            posts,
            FakeUserRepo::with_users(vec![sample_user("u1", "alice")]),
            FixedRateLimiter::allowing(),
        );

        let created = service
            .create(Some(&actor("u1")), content("hello"))
            .await
            .expect("create must succeed");
        let fetched = service
            .get_by_id(&created.id.to_string())
            .await
            .expect("created post must be found");
        assert_eq!(fetched.post.id, created.id);
    }

    #[tokio::test]
    async fn create_rejects_out_of_range_content_without_writing() {
        let posts = FakePostRepo::default();
        let limiter = FixedRateLimiter::allowing();
        let service = service(posts.clone(), FakeUserRepo::default(), limiter.clone());

        for bad in [String::new(), "x".repeat(281)] {
            let err = service
                .create(Some(&actor("u1")), CreatePostRequest { content: bad })
                .await
                .expect_err("must be rejected");
            assert!(matches!(err, DomainError::Validation { field: "content", .. }));
        }

        assert_eq!(posts.created_count(), 0);
        assert_eq!(limiter.call_count(), 0);
    }

    #[tokio::test]
    async fn create_without_actor_is_unauthenticated() {
        let posts = FakePostRepo::default();
        let limiter = FixedRateLimiter::allowing();
        let service = service(posts.clone(), FakeUserRepo::default(), limiter.clone());

        let err = service
            .create(None, content("hello"))
            .await
            .expect_err("must be rejected");
        assert!(matches!(err, DomainError::Unauthenticated));

        let err = service
            .create(Some(&actor("   ")), content(""))
            .await
            .expect_err("blank actor must be rejected before validation");
        assert!(matches!(err, DomainError::Unauthenticated));

        assert_eq!(posts.created_count(), 0);
        assert_eq!(limiter.call_count(), 0);
    }

    #[tokio::test]
    async fn create_when_limited_performs_no_write() {
        let posts = FakePostRepo::default();
        let service = service(posts.clone(), FakeUserRepo::default(), FixedRateLimiter::denying());

        let err = service
            .create(Some(&actor("u1")), content("hello"))
            .await
            .expect_err("must be rate limited");
        assert!(matches!(err, DomainError::RateLimited));
        assert_eq!(posts.created_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn fourth_post_in_a_minute_is_limited_until_window_passes() {
        let posts = FakePostRepo::default();
        let service = PostService::new(
            Arc::new(posts.clone()),
            Arc::new(FakeUserRepo::default()),
            Arc::new(InMemoryRateLimiter::new(RateLimitConfig::default())),
        );
        let alice = actor("u1");

        for i in 0..3 {
            service
                .create(Some(&alice), content(&format!("post {i}")))
                .await
                .expect("first three posts must succeed");
        }

        let err = service
            .create(Some(&alice), content("one too many"))
            .await
            .expect_err("fourth post must be limited");
        assert!(matches!(err, DomainError::RateLimited));
        assert_eq!(posts.created_count(), 3);

        service
            .create(Some(&actor("u2")), content("someone else"))
            .await
            .expect("other users are not affected");

        tokio::time::advance(Duration::from_secs(60)).await;
        service
            .create(Some(&alice), content("back again"))
            .await
            .expect("post after the window must succeed");
        assert_eq!(posts.created_count(), 5);
    }
}
