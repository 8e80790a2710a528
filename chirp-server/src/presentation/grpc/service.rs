use tonic::{Request, Response, Status};

use crate::presentation::{
    AppState,
    grpc::mappers::{
        to_domain_create_post_request, to_proto_author, to_proto_authored_post,
        to_proto_authored_post_list, to_proto_post,
    },
};

use super::interceptors::resolve_actor;
use super::proto::{
    Author, AuthoredPost, AuthoredPostList, CreatePostRequest, GetAllPostsRequest,
    GetPostByIdRequest, GetPostsByUserIdRequest, GetUserByUsernameRequest, Post,
    PostService as PostRpc, PostServiceServer, ProfileService as ProfileRpc, ProfileServiceServer,
};
use super::status::map_domain_error;

#[derive(Clone)]
pub(crate) struct GrpcPostService {
    state: AppState,
}

impl GrpcPostService {
    pub(crate) fn new(state: AppState) -> Self {
        Self { state }
    }

    pub(crate) fn into_server(self) -> PostServiceServer<Self> {
        PostServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl PostRpc for GrpcPostService {
    async fn get_all(
        &self,
        _request: Request<GetAllPostsRequest>,
    ) -> Result<Response<AuthoredPostList>, Status> {
        let posts = self
            .state
            .post_service
            .list_all()
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(to_proto_authored_post_list(posts)))
    }

    async fn get_posts_by_user_id(
        &self,
        request: Request<GetPostsByUserIdRequest>,
    ) -> Result<Response<AuthoredPostList>, Status> {
        let posts = self
            .state
            .post_service
            .list_by_author(&request.into_inner().user_id)
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(to_proto_authored_post_list(posts)))
    }

    async fn get_post_by_id(
        &self,
        request: Request<GetPostByIdRequest>,
    ) -> Result<Response<AuthoredPost>, Status> {
        let post = self
            .state
            .post_service
            .get_by_id(&request.into_inner().post_id)
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(to_proto_authored_post(post)))
    }

    async fn create(&self, request: Request<CreatePostRequest>) -> Result<Response<Post>, Status> {
        let actor = resolve_actor(self.state.jwt.as_ref(), request.metadata())?;
        let req = to_domain_create_post_request(request.into_inner());

        let post = self
            .state
            .post_service
            .create(actor.as_ref(), req)
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(to_proto_post(post)))
    }
}

#[derive(Clone)]
pub(crate) struct GrpcProfileService {
    state: AppState,
}

impl GrpcProfileService {
    pub(crate) fn new(state: AppState) -> Self {
        Self { state }
    }

    pub(crate) fn into_server(self) -> ProfileServiceServer<Self> {
        ProfileServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl ProfileRpc for GrpcProfileService {
    async fn get_user_by_username(
        &self,
        request: Request<GetUserByUsernameRequest>,
    ) -> Result<Response<Author>, Status> {
        let author = self
            .state
            .profile_service
            .get_by_username(&request.into_inner().username)
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(to_proto_author(author)))
    }
}
