use std::path::Path;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::server::api;
use crate::server::AppState;

/// API routes, with the SPA bundle served for every other path when `static_dir` is set.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/api/health", get(api::health))
        .route("/api/upgrades", get(api::list_upgrades))
        .route("/api/pilots", get(api::list_pilots))
        .route("/api/ships", get(api::list_ships))
        .route("/api/builds", post(api::create_build))
        .route("/api/builds/:id", get(api::get_build))
        .route("/api/builds/:id/actions", post(api::apply_action))
        .route("/api/builds/:id/available", get(api::available))
        .route("/api/ledger/decode", post(api::decode_ledger));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.fallback(api::not_found),
    };
    router.with_state(state)
}
