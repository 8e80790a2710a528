use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tonic::transport::Server;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::infrastructure::settings::Settings;
use crate::presentation::AppState;
use crate::presentation::grpc::service::{GrpcPostService, GrpcProfileService};
use crate::presentation::http::middleware::cors::apply_cors;
use crate::presentation::http::middleware::limits::apply_limits;
use crate::presentation::http::middleware::trace::apply_trace;
use crate::presentation::http::openapi::ApiDoc;
use crate::presentation::http::routes;

pub(crate) async fn run_http(settings: &Settings, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    let app = apply_limits(app, settings);
    let app = apply_trace(app);
    let app = apply_cors(app, settings)?;

    let listener = TcpListener::bind(&settings.http_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", settings.http_addr))?;

    info!("HTTP server listening on {}", settings.http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub(crate) fn build_router(state: AppState) -> Router {
    routes::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

pub(crate) async fn run_grpc(settings: &Settings, state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = settings
        .grpc_addr
        .parse()
        .with_context(|| format!("invalid GRPC_ADDR '{}'", settings.grpc_addr))?;

    let posts = GrpcPostService::new(state.clone())
        .into_server()
        .max_decoding_message_size(settings.grpc_max_decoding_message_size_bytes)
        .max_encoding_message_size(settings.grpc_max_encoding_message_size_bytes);
    let profiles = GrpcProfileService::new(state)
        .into_server()
        .max_decoding_message_size(settings.grpc_max_decoding_message_size_bytes)
        .max_encoding_message_size(settings.grpc_max_encoding_message_size_bytes);

    info!("gRPC server listening on {addr}");
    Server::builder()
        .concurrency_limit_per_connection(settings.grpc_concurrency_limit)
        .timeout(Duration::from_secs(settings.grpc_request_timeout_secs))
        .add_service(posts)
        .add_service(profiles)
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
