use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::{error::ApiResult, state::AppState};
use crate::domain::{DiseaseInfo, SymptomEntry};

/// GET /symptoms
pub async fn list_symptoms(State(state): State<AppState>) -> ApiResult<Json<Vec<SymptomEntry>>> {
    Ok(Json(state.ctx.symptoms()?))
}

/// GET /classes
pub async fn list_classes(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.ctx.classes()?))
}

/// GET /diseases/:name
pub async fn get_disease(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<DiseaseInfo>> {
    Ok(Json(state.ctx.disease_info(&name)?))
}
