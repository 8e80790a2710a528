use thiserror::Error;
use tonic::Code;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `chirp-client`.
pub enum ChirpClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Ошибка gRPC-метода (`tonic::Status`).
    #[error("grpc status error: {0}")]
    GrpcStatus(#[from] tonic::Status),

    /// Ошибка подключения/канала gRPC (`tonic::transport::Error`).
    #[error("grpc transport error: {0}")]
    GrpcTransport(#[from] tonic::transport::Error),

    /// Требуется авторизация (отсутствует/некорректен токен).
    #[error("unauthorized")]
    Unauthorized,

    /// Запрошенный пост или профиль не найден.
    #[error("not found")]
    NotFound,

    /// Превышен лимит публикаций, нужно подождать.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Некорректный запрос или ошибка валидации на сервере.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Результат операций `chirp-client`.
pub type ChirpClientResult<T> = Result<T, ChirpClientError>;

impl ChirpClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized
            }
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            reqwest::StatusCode::TOO_MANY_REQUESTS => Self::RateLimited(message),
            _ => Self::InvalidRequest(message),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }

    pub(crate) fn from_grpc_status(status: tonic::Status) -> Self {
        match status.code() {
            Code::Unauthenticated | Code::PermissionDenied => Self::Unauthorized,
            Code::NotFound => Self::NotFound,
            Code::ResourceExhausted => Self::RateLimited(status.message().to_string()),
            Code::InvalidArgument | Code::FailedPrecondition => {
                Self::InvalidRequest(status.message().to_string())
            }
            _ => Self::GrpcStatus(status),
        }
    }
}
