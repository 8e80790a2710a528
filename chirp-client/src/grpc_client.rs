use std::time::Duration;
use tonic::metadata::MetadataValue;
use tonic::transport::{Channel, Endpoint};
use uuid::Uuid;

use crate::error::{ChirpClientError, ChirpClientResult};
use crate::models::{Author, AuthoredPost, Post};

pub mod pb {
    tonic::include_proto!("chirp");
}

use pb::post_service_client::PostServiceClient;
use pb::profile_service_client::ProfileServiceClient;

#[derive(Debug, Clone)]
/// gRPC-клиент для API `chirp-server`.
pub struct GrpcClient {
    endpoint: String,
}

impl GrpcClient {
    /// Создаёт новый gRPC-клиент с endpoint сервера.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Возвращает до 100 последних постов ленты.
    pub async fn feed(&self) -> ChirpClientResult<Vec<AuthoredPost>> {
        let mut client = PostServiceClient::new(self.connect().await?);
        let response = client
            .get_all(pb::GetAllPostsRequest {})
            .await
            .map_err(ChirpClientError::from_grpc_status)?;

        Self::map_authored_post_list(response.into_inner())
    }

    /// Возвращает до 100 последних постов пользователя.
    pub async fn posts_by_user(&self, user_id: &str) -> ChirpClientResult<Vec<AuthoredPost>> {
        let mut client = PostServiceClient::new(self.connect().await?);
        let response = client
            .get_posts_by_user_id(pb::GetPostsByUserIdRequest {
                user_id: user_id.to_string(),
            })
            .await
            .map_err(ChirpClientError::from_grpc_status)?;

        Self::map_authored_post_list(response.into_inner())
    }

    /// Получает пост по идентификатору.
    pub async fn get_post(&self, id: &str) -> ChirpClientResult<AuthoredPost> {
        let mut client = PostServiceClient::new(self.connect().await?);
        let response = client
            .get_post_by_id(pb::GetPostByIdRequest {
                post_id: id.to_string(),
            })
            .await
            .map_err(ChirpClientError::from_grpc_status)?;

        Self::map_authored_post(response.into_inner())
    }

    /// Публикует пост от имени владельца токена.
    pub async fn create_post(&self, token: &str, content: &str) -> ChirpClientResult<Post> {
        let mut client = PostServiceClient::new(self.connect().await?);
        let request = tonic::Request::new(pb::CreatePostRequest {
            content: content.to_string(),
        });
        let request = Self::attach_bearer_token(request, token)?;

        let response = client
            .create(request)
            .await
            .map_err(ChirpClientError::from_grpc_status)?;

        Self::map_post(response.into_inner())
    }

    /// Получает профиль по точному имени пользователя.
    pub async fn get_profile(&self, username: &str) -> ChirpClientResult<Author> {
        let mut client = ProfileServiceClient::new(self.connect().await?);
        let response = client
            .get_user_by_username(pb::GetUserByUsernameRequest {
                username: username.to_string(),
            })
            .await
            .map_err(ChirpClientError::from_grpc_status)?;

        Ok(Self::map_author(response.into_inner()))
    }

    async fn connect(&self) -> ChirpClientResult<Channel> {
        let endpoint =
            if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
                self.endpoint.clone()
            } else {
                format!("http://{}", self.endpoint)
            };

        let channel = Endpoint::from_shared(endpoint)
            .map_err(|err| {
                ChirpClientError::InvalidRequest(format!("invalid grpc endpoint: {err}"))
            })?
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .connect()
            .await
            .map_err(ChirpClientError::GrpcTransport)?;
        Ok(channel)
    }

    fn map_authored_post_list(proto: pb::AuthoredPostList) -> ChirpClientResult<Vec<AuthoredPost>> {
        proto
            .posts
            .into_iter()
            .map(Self::map_authored_post)
            .collect()
    }

    fn map_authored_post(proto: pb::AuthoredPost) -> ChirpClientResult<AuthoredPost> {
        let post = proto.post.ok_or_else(|| {
            ChirpClientError::InvalidRequest("grpc authored post is missing post".to_string())
        })?;
        let author = proto.author.ok_or_else(|| {
            ChirpClientError::InvalidRequest("grpc authored post is missing author".to_string())
        })?;

        Ok(AuthoredPost {
            post: Self::map_post(post)?,
            author: Self::map_author(author),
        })
    }

    fn map_post(proto: pb::Post) -> ChirpClientResult<Post> {
        let id = Uuid::parse_str(&proto.id).map_err(|_| {
            ChirpClientError::InvalidRequest(format!("invalid grpc post id '{}'", proto.id))
        })?;
        let created_at = proto.created_at.ok_or_else(|| {
            ChirpClientError::InvalidRequest("grpc post is missing created_at".to_string())
        })?;

        Ok(Post {
            id,
            content: proto.content,
            author_id: proto.author_id,
            created_at: Self::map_timestamp(created_at, "post.created_at")?,
        })
    }

    fn map_author(proto: pb::Author) -> Author {
        Author {
            id: proto.id,
            name: proto.name,
            image: proto.image,
        }
    }

    fn map_timestamp(
        ts: prost_types::Timestamp,
        field_name: &str,
    ) -> ChirpClientResult<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(ts.seconds, ts.nanos.max(0) as u32).ok_or_else(|| {
            ChirpClientError::InvalidRequest(format!("invalid grpc timestamp in {field_name}"))
        })
    }

    fn attach_bearer_token<T>(
        mut request: tonic::Request<T>,
        token: &str,
    ) -> ChirpClientResult<tonic::Request<T>> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ChirpClientError::Unauthorized);
        }

        let header = MetadataValue::try_from(format!("Bearer {token}")).map_err(|_| {
            ChirpClientError::InvalidRequest("invalid token format for grpc metadata".to_string())
        })?;

        request.metadata_mut().insert("authorization", header);
        Ok(request)
    }
}
