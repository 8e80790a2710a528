use chrono::{DateTime, Utc};
use prost_types::Timestamp;

use crate::domain::post::{
    AuthoredPost as DomainAuthoredPost, CreatePostRequest as DomainCreatePostRequest,
    Post as DomainPost,
};
use crate::domain::user::Author as DomainAuthor;

use super::proto::{Author, AuthoredPost, AuthoredPostList, CreatePostRequest, Post};

pub(crate) fn to_domain_create_post_request(input: CreatePostRequest) -> DomainCreatePostRequest {
    DomainCreatePostRequest {
        content: input.content,
    }
}

pub(crate) fn to_proto_post(post: DomainPost) -> Post {
    Post {
        id: post.id.to_string(),
        content: post.content,
        author_id: post.author_id,
        created_at: Some(to_proto_timestamp(post.created_at)),
    }
}

pub(crate) fn to_proto_author(author: DomainAuthor) -> Author {
    Author {
        id: author.id,
        name: author.name,
        image: author.image,
    }
}

pub(crate) fn to_proto_authored_post(value: DomainAuthoredPost) -> AuthoredPost {
    AuthoredPost {
        post: Some(to_proto_post(value.post)),
        author: Some(to_proto_author(value.author)),
    }
}

pub(crate) fn to_proto_authored_post_list(posts: Vec<DomainAuthoredPost>) -> AuthoredPostList {
    AuthoredPostList {
        posts: posts.into_iter().map(to_proto_authored_post).collect(),
    }
}

fn to_proto_timestamp(value: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: value.timestamp(),
        nanos: value.timestamp_subsec_nanos() as i32,
    }
}
