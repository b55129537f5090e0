use anyhow::Result;
use apart_core::{Recommendation, RecommendationRequest, Recommender};
use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}, routing::{get, post}, Json, Router};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Error body for failed requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

/// Load the dataset and model artifacts, then build the router.
/// Fails if anything is missing or inconsistent so the server never starts half-loaded.
pub fn build_app(data_path: &str, model_dir: &str) -> Result<Router> {
    let recommender = Recommender::load(data_path, model_dir)?;
    Ok(router(Arc::new(recommender)))
}

pub fn router(recommender: Arc<Recommender>) -> Router {
    let app_state = AppState { recommender };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(AnyOrigin).allow_methods(AnyOrigin).allow_headers(AnyOrigin)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(AnyOrigin).allow_headers(AnyOrigin)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(AnyOrigin).allow_methods(AnyOrigin).allow_headers(AnyOrigin),
    };

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(|| async { "ok" }))
        .route("/recommendations", post(recommend_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "API is up and running!" }))
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    Json(req): Json<RecommendationRequest>,
) -> Result<Json<Vec<Recommendation>>, (StatusCode, Json<ErrorDetail>)> {
    match state.recommender.recommend(&req) {
        Ok(results) => Ok(Json(results)),
        Err(e) => {
            tracing::error!(error = %e, "recommendation failed");
            Err(internal_error(e))
        }
    }
}

fn internal_error(err: impl std::fmt::Display) -> (StatusCode, Json<ErrorDetail>) {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorDetail { detail: err.to_string() }))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "request handler panicked".to_string()
    };
    tracing::error!(%detail, "request panicked");
    internal_error(detail).into_response()
}
