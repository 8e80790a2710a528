use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::presentation::AppState;

pub(crate) mod posts;
pub(crate) mod profiles;

pub(crate) fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(posts::router(state.clone()))
        .merge(profiles::router());

    Router::new()
        .route("/healthz", get(health_handler))
        .nest("/api", api)
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}
