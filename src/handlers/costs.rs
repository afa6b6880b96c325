use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{CostReport, ProviderComparison, Workload};

pub async fn calculate(
    State(state): State<AppState>,
    Json(workload): Json<Workload>,
) -> Result<Json<CostReport>, AppError> {
    workload.validate().map_err(AppError::bad_request)?;

    let report = state
        .engine
        .calculate_workload_cost(&workload)
        .await
        .map_err(|e| AppError::pricing_failure(e, "Error calculating costs"))?;
    Ok(Json(report))
}

pub async fn compare(
    State(state): State<AppState>,
    Json(workload): Json<Workload>,
) -> Result<Json<ProviderComparison>, AppError> {
    workload.validate().map_err(AppError::bad_request)?;

    let comparison = state
        .engine
        .compare_providers(&workload)
        .await
        .map_err(|e| AppError::pricing_failure(e, "Error calculating costs"))?;
    Ok(Json(comparison))
}
