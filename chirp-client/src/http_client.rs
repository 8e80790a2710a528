use reqwest::{Client, Method, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{ChirpClientError, ChirpClientResult};
use crate::models::{Author, AuthoredPost, Post};

#[derive(Debug, Serialize)]
struct CreatePostRequestDto<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API `chirp-server`.
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    pub fn new(base_url: impl Into<String>) -> ChirpClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Собирает URL из сегментов пути; сегменты экранируются.
    fn endpoint(&self, segments: &[&str]) -> ChirpClientResult<Url> {
        let invalid = || ChirpClientError::InvalidRequest(format!("invalid base url: {}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode_error(response: reqwest::Response) -> ChirpClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body.error,
            Err(_) => None,
        };
        ChirpClientError::from_http_status(status, message)
    }

    async fn send<TRes: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> ChirpClientResult<TRes> {
        let response = request
            .send()
            .await
            .map_err(ChirpClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<TRes>()
            .await
            .map_err(ChirpClientError::from_reqwest)
    }

    async fn get_json<TRes: DeserializeOwned>(&self, segments: &[&str]) -> ChirpClientResult<TRes> {
        let url = self.endpoint(segments)?;
        self.send(self.client.request(Method::GET, url)).await
    }

    /// Возвращает до 100 последних постов ленты.
    pub async fn feed(&self) -> ChirpClientResult<Vec<AuthoredPost>> {
        self.get_json(&["api", "posts"]).await
    }

    /// Возвращает до 100 последних постов пользователя.
    pub async fn posts_by_user(&self, user_id: &str) -> ChirpClientResult<Vec<AuthoredPost>> {
        self.get_json(&["api", "users", user_id, "posts"]).await
    }

    /// Получает пост по идентификатору.
    pub async fn get_post(&self, id: &str) -> ChirpClientResult<AuthoredPost> {
        self.get_json(&["api", "posts", id]).await
    }

    /// Публикует пост от имени владельца токена.
    pub async fn create_post(&self, token: &str, content: &str) -> ChirpClientResult<Post> {
        let url = self.endpoint(&["api", "posts"])?;
        let request = self
            .client
            .request(Method::POST, url)
            .bearer_auth(token)
            .json(&CreatePostRequestDto { content });
        self.send(request).await
    }

    /// Получает профиль по точному имени пользователя.
    pub async fn get_profile(&self, username: &str) -> ChirpClientResult<Author> {
        self.get_json(&["api", "profiles", username]).await
    }
}
