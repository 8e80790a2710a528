pub(crate) mod pb {
    tonic::include_proto!("chirp");
}

pub(crate) use pb::post_service_server::{PostService, PostServiceServer};
pub(crate) use pb::profile_service_server::{ProfileService, ProfileServiceServer};
pub(crate) use pb::{
    Author, AuthoredPost, AuthoredPostList, CreatePostRequest, GetAllPostsRequest,
    GetPostByIdRequest, GetPostsByUserIdRequest, GetUserByUsernameRequest, Post,
};
