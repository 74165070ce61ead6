use std::sync::Arc;

use axum::{Router, middleware::from_fn, routing::get};
use error::ApiError;
use state::State;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, decompression::RequestDecompressionLayer,
};

pub mod config;
pub mod entity;
pub mod error;
pub mod insights;
pub mod state;
pub mod store;

mod middleware;
mod openapi;
mod routes;

pub use axum;
pub use openapi::ApiDoc;
pub use sea_orm;

pub fn construct_router(state: Arc<State>) -> Router {
    let router = Router::new()
        .nest("/health", routes::health::routes())
        .route("/rankings", get(routes::rankings::get_rankings))
        .route("/ly-comparison", get(routes::comparison::get_comparison))
        .nest("/webhooks", routes::webhook::routes())
        .with_state(state)
        .route("/openapi.json", get(openapi::openapi_json))
        .fallback(|| async { ApiError::NOT_FOUND })
        .layer(from_fn(middleware::error_reporting::error_reporting_middleware))
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new()),
        );

    Router::new().nest("/api", router)
}
