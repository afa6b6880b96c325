use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{RecommendationReport, Workload};

pub async fn generate(
    State(state): State<AppState>,
    Json(workload): Json<Workload>,
) -> Result<Json<RecommendationReport>, AppError> {
    workload.validate().map_err(AppError::bad_request)?;

    let report = state.engine.generate_recommendations(&workload).await;
    tracing::info!(
        total = report.summary.total_recommendations,
        high = report.summary.high_priority,
        "Generated recommendations"
    );
    Ok(Json(report))
}
