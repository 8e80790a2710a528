//! Клиентская библиотека для работы с chirp-server по HTTP или gRPC.
//!
//! Предоставляет единый API (`ChirpClient`) поверх двух транспортов:
//! - HTTP (`reqwest`)
//! - gRPC (`tonic`)
//!
//! Сервер не выдаёт токены: JWT приходит от внешнего провайдера
//! идентификации и устанавливается через `set_token`.
#![warn(missing_docs)]

mod error;
mod grpc_client;
mod http_client;
mod models;

pub use error::{ChirpClientError, ChirpClientResult};
pub use models::{Author, AuthoredPost, Post};

use grpc_client::GrpcClient;
use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Транспорт, через который `ChirpClient` отправляет запросы.
pub enum Transport {
    /// HTTP-транспорт с базовым URL, например `http://127.0.0.1:8080`.
    Http(String),
    /// gRPC-транспорт с endpoint, например `http://127.0.0.1:50051`.
    Grpc(String),
}

#[derive(Debug, Clone)]
enum Backend {
    Http(HttpClient),
    Grpc(GrpcClient),
}

#[derive(Debug, Clone)]
/// Унифицированный клиент chirp-server через HTTP или gRPC.
pub struct ChirpClient {
    backend: Backend,
    token: Option<String>,
}

impl ChirpClient {
    /// Создаёт клиент с выбранным транспортом.
    pub fn new(transport: Transport) -> ChirpClientResult<Self> {
        let backend = match transport {
            Transport::Http(base_url) => Backend::Http(HttpClient::new(base_url)?),
            Transport::Grpc(endpoint) => Backend::Grpc(GrpcClient::new(endpoint)),
        };

        Ok(Self {
            backend,
            token: None,
        })
    }

    /// Устанавливает JWT-токен.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий JWT-токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает сохранённый JWT-токен.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Возвращает до 100 последних постов ленты, от новых к старым.
    pub async fn feed(&self) -> ChirpClientResult<Vec<AuthoredPost>> {
        match &self.backend {
            Backend::Http(client) => client.feed().await,
            Backend::Grpc(client) => client.feed().await,
        }
    }

    /// Возвращает до 100 последних постов пользователя.
    pub async fn posts_by_user(&self, user_id: &str) -> ChirpClientResult<Vec<AuthoredPost>> {
        match &self.backend {
            Backend::Http(client) => client.posts_by_user(user_id).await,
            Backend::Grpc(client) => client.posts_by_user(user_id).await,
        }
    }

    /// Возвращает пост с автором по идентификатору.
    pub async fn get_post(&self, id: &str) -> ChirpClientResult<AuthoredPost> {
        match &self.backend {
            Backend::Http(client) => client.get_post(id).await,
            Backend::Grpc(client) => client.get_post(id).await,
        }
    }

    /// Публикует пост.
    ///
    /// Требует установленный JWT-токен. Частые публикации отклоняются
    /// с `ChirpClientError::RateLimited`.
    pub async fn create_post(&self, content: &str) -> ChirpClientResult<Post> {
        let token = self.require_token()?;
        match &self.backend {
            Backend::Http(client) => client.create_post(token, content).await,
            Backend::Grpc(client) => client.create_post(token, content).await,
        }
    }

    /// Возвращает профиль по точному имени пользователя.
    pub async fn get_profile(&self, username: &str) -> ChirpClientResult<Author> {
        match &self.backend {
            Backend::Http(client) => client.get_profile(username).await,
            Backend::Grpc(client) => client.get_profile(username).await,
        }
    }

    fn require_token(&self) -> ChirpClientResult<&str> {
        self.token.as_deref().ok_or(ChirpClientError::Unauthorized)
    }
}
