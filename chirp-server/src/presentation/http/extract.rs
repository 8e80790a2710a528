use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::presentation::http::app_error::AppError;

/// Request body that names the field reported when it cannot be decoded.
pub(crate) trait JsonBody: DeserializeOwned {
    const FIELD: &'static str;
}

/// Local version of [`axum::Json`] that rejects with the API error body
/// instead of axum's plain-text rejection.
pub(crate) struct ApiJson<T>(pub(crate) T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: JsonBody,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(invalid_body(rejection, T::FIELD)),
        }
    }
}

fn invalid_body(rejection: JsonRejection, field: &'static str) -> AppError {
    // Oversized bodies keep their 413.
    let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        StatusCode::PAYLOAD_TOO_LARGE
    } else {
        StatusCode::BAD_REQUEST
    };

    let message = match rejection {
        JsonRejection::JsonDataError(err) => err.body_text(),
        JsonRejection::JsonSyntaxError(err) => err.body_text(),
        JsonRejection::MissingJsonContentType(_) => "expected an application/json body".to_string(),
        JsonRejection::BytesRejection(err) => err.body_text(),
        other => {
            warn!(rejection = ?other, "unhandled json rejection");
            other.body_text()
        }
    };

    AppError::InvalidBody {
        status,
        field,
        message,
    }
}
