use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::post_service::PostService;
use application::profile_service::ProfileService;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::rate_limit::RateLimiter;
use infrastructure::rate_limit::memory::InMemoryRateLimiter;
use infrastructure::rate_limit::redis_backend::RedisRateLimiter;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level, settings.log_format)?;

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    let limiter: Arc<dyn RateLimiter> = match &settings.redis_url {
        Some(url) => {
            info!("post rate limiter backed by redis");
            Arc::new(RedisRateLimiter::connect(url, settings.post_rate_limit).await?)
        }
        None => {
            info!("post rate limiter kept in process memory");
            Arc::new(InMemoryRateLimiter::new(settings.post_rate_limit))
        }
    };

    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let posts = Arc::new(PostgresPostRepository::new(pool));

    let post_service = Arc::new(PostService::new(posts, users.clone(), limiter));
    let profile_service = Arc::new(ProfileService::new(users));
    let jwt = Arc::new(JwtService::new(&settings.jwt_secret));

    let state = AppState::new(post_service, profile_service, jwt);

    tokio::try_join!(
        server::run_http(&settings, state.clone()),
        server::run_grpc(&settings, state),
    )?;

    Ok(())
}
