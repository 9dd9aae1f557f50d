use axum::Router;
use axum::routing::get;
use tower_http::compression::CompressionLayer;

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::map::get_page))
        .route("/choropleth.svg", get(routes::map::get_svg))
        .route("/api/regions/{id}", get(routes::api::get_region))
        .route("/api/health", get(routes::api::health))
        .layer(CompressionLayer::new())
        .with_state(state)
}
