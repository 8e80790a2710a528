use crate::domain::error::DomainError;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{message}")]
    InvalidBody {
        status: StatusCode,
        field: &'static str,
        message: String,
    },
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) field: Option<&'static str>,
}

const RATE_LIMITED_MESSAGE: &str = "you are posting too fast, try again later";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg, field) = match self {
            AppError::Domain(err) => match &err {
                DomainError::Validation { field, message } => (
                    StatusCode::BAD_REQUEST,
                    format!("{field} {message}"),
                    Some(*field),
                ),
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string(), None),
                DomainError::Unauthenticated => {
                    (StatusCode::UNAUTHORIZED, "unauthorized".to_string(), None)
                }
                DomainError::RateLimited => (
                    StatusCode::TOO_MANY_REQUESTS,
                    RATE_LIMITED_MESSAGE.to_string(),
                    None,
                ),
                DomainError::IntegrityFault(_) | DomainError::Unexpected(_) => {
                    error!(error = %err, "request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error".to_string(),
                        None,
                    )
                }
            },
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string(), None),
            AppError::InvalidBody {
                status,
                field,
                message,
            } => (status, message, Some(field)),
        };

        let mut response = (status, Json(ErrorBody { error: msg, field })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
