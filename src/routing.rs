//! Application router configuration.

use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::{
    AppState, endpoints,
    ingest::initialize,
    listing::get_transactions,
    logging::logging_middleware,
    report::{
        get_category_report, get_price_range_report, get_statistics_report, get_summary_report,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::INITIALIZE, get(initialize))
        .route(endpoints::TRANSACTIONS, get(get_transactions))
        .route(endpoints::STATISTICS, get(get_statistics_report))
        .route(endpoints::BAR_CHART, get(get_price_range_report))
        .route(endpoints::PIE_CHART, get(get_category_report))
        .route(endpoints::SUMMARY, get(get_summary_report))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_404_not_found(uri: Uri) -> Response {
    tracing::debug!("no route for {uri}");

    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("No route for {}", uri.path()) })),
    )
        .into_response()
}
