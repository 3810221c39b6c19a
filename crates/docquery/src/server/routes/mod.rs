//! API routes for the query server

pub mod index;
pub mod query;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/query",
            post(query::handle_query).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route(
            "/index",
            post(index::build_index).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/info", axum::routing::get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "docquery",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "PDF question answering with semantic retrieval and literal page matching",
        "endpoints": {
            "POST /api/query": "Upload a PDF with a query; returns an answer and literal match pages",
            "POST /api/index": "Chunk, embed, and add a PDF to the vector index",
            "GET /health": "Liveness check",
            "GET /ready": "Readiness check"
        }
    }))
}
