use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        // Prediction endpoints
        .route("/predict", post(handlers::predict))
        .route("/predict/label", post(handlers::predict_label))
        .route("/predict/vector", post(handlers::predict_vector))
        .route("/predict/vector/report", post(handlers::predict_vector_report))
        // Catalog endpoints
        .route("/symptoms", get(handlers::list_symptoms))
        .route("/classes", get(handlers::list_classes))
        .route("/diseases/:name", get(handlers::get_disease))
        // System endpoints
        .route("/health", get(handlers::health))
        .route("/healthz", get(handlers::liveness))
        .route("/readyz", get(handlers::readiness))
        .route("/metrics", get(handlers::metrics))
        // Add state, tracing and CORS
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
