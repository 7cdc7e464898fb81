use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::api::{
    error::{ApiError, ApiResult},
    state::AppState,
    types::{LabelResponse, SymptomRequest, VectorRequest},
};
use crate::domain::PredictionReport;

/// Unwrap a JSON body, counting a rejected body as a validation error.
fn accept<T>(state: &AppState, payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    state.metrics.inc_requests();
    payload.map(|Json(body)| body).map_err(|rejection| {
        state.metrics.inc_validation_errors();
        ApiError::from(rejection)
    })
}

/// POST /predict -- focus-disease risks and top predictions for selected symptoms
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<SymptomRequest>, JsonRejection>,
) -> ApiResult<Json<PredictionReport>> {
    let req = accept(&state, payload)?;
    state.track(state.ctx.assess_symptoms(&req.symptoms)).map(Json)
}

/// POST /predict/label -- single most likely disease for selected symptoms
pub async fn predict_label(
    State(state): State<AppState>,
    payload: Result<Json<SymptomRequest>, JsonRejection>,
) -> ApiResult<Json<LabelResponse>> {
    let req = accept(&state, payload)?;
    state
        .track(state.ctx.predict_label(&req.symptoms))
        .map(|prediction| Json(LabelResponse { prediction }))
}

/// POST /predict/vector -- single most likely disease for a 0/1 feature vector
pub async fn predict_vector(
    State(state): State<AppState>,
    payload: Result<Json<VectorRequest>, JsonRejection>,
) -> ApiResult<Json<LabelResponse>> {
    let req = accept(&state, payload)?;
    state
        .track(state.ctx.predict_label_vector(&req.symptoms))
        .map(|prediction| Json(LabelResponse { prediction }))
}

/// POST /predict/vector/report -- full report for a 0/1 feature vector
pub async fn predict_vector_report(
    State(state): State<AppState>,
    payload: Result<Json<VectorRequest>, JsonRejection>,
) -> ApiResult<Json<PredictionReport>> {
    let req = accept(&state, payload)?;
    state.track(state.ctx.assess_vector(&req.symptoms)).map(Json)
}
