use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::user::Author;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthorDto {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) image: String,
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            image: author.image,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/profiles/{username}",
    tag = "profiles",
    params(
        ("username" = String, Path, description = "Exact, case-sensitive user name without '@'")
    ),
    responses(
        (status = 200, description = "Profile found", body = AuthorDto),
        (status = 404, description = "No user with that name"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<(StatusCode, Json<AuthorDto>)> {
    let author = state.profile_service.get_by_username(&username).await?;
    Ok((StatusCode::OK, Json(author.into())))
}
