use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::storage::Storage,
    routes::{event_route::event_router, vote_route::vote_router},
};

pub fn create_app(storage: Arc<Storage>, cors: CorsLayer) -> Router {
    let api = Router::new()
        .nest("/events", event_router())
        .merge(vote_router());

    Router::new()
        .nest("/api", api)
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(storage))
        .layer(cors)
}
