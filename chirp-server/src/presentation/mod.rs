use std::sync::Arc;

use crate::application::post_service::PostService;
use crate::application::profile_service::ProfileService;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod grpc;
pub(crate) mod http;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) post_service: Arc<PostService>,
    pub(crate) profile_service: Arc<ProfileService>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(
        post_service: Arc<PostService>,
        profile_service: Arc<ProfileService>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            post_service,
            profile_service,
            jwt,
        }
    }
}
