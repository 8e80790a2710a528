use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::post::{AuthoredPost, CreatePostRequest, Post};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::{ApiJson, JsonBody};
use crate::presentation::http::handlers::profiles::AuthorDto;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreatePostDto {
    /// 1..=280 characters, stored verbatim.
    pub(crate) content: String,
}

impl JsonBody for CreatePostDto {
    const FIELD: &'static str = "content";
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: Uuid,
    pub(crate) content: String,
    pub(crate) author_id: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthoredPostDto {
    pub(crate) post: PostDto,
    pub(crate) author: AuthorDto,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            content: post.content,
            author_id: post.author_id,
            created_at: post.created_at,
        }
    }
}

impl From<AuthoredPost> for AuthoredPostDto {
    fn from(value: AuthoredPost) -> Self {
        Self {
            post: value.post.into(),
            author: value.author.into(),
        }
    }
}

fn to_dtos(posts: Vec<AuthoredPost>) -> Vec<AuthoredPostDto> {
    posts.into_iter().map(AuthoredPostDto::from).collect()
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    responses(
        (status = 200, description = "Up to 100 newest posts with authors", body = [AuthoredPostDto]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<AuthoredPostDto>>)> {
    let posts = state.post_service.list_all().await?;
    Ok((StatusCode::OK, Json(to_dtos(posts))))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/posts",
    tag = "posts",
    params(
        ("user_id" = String, Path, description = "Author id")
    ),
    responses(
        (status = 200, description = "Up to 100 newest posts by the user", body = [AuthoredPostDto]),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<(StatusCode, Json<Vec<AuthoredPostDto>>)> {
    let posts = state.post_service.list_by_author(&user_id).await?;
    Ok((StatusCode::OK, Json(to_dtos(posts))))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = String, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post found", body = AuthoredPostDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<AuthoredPostDto>)> {
    let post = state.post_service.get_by_id(&id).await?;
    Ok((StatusCode::OK, Json(post.into())))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Malformed body, or content too short or too long"),
        (status = 401, description = "Unauthorized"),
        (status = 429, description = "Posting too fast"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(dto): ApiJson<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let req = CreatePostRequest {
        content: dto.content,
    };

    let post = state.post_service.create(Some(&auth.actor()), req).await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}
