use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{PriceTable, Provider};

pub async fn compute(
    State(state): State<AppState>,
    Path((provider, region)): Path<(String, String)>,
) -> Result<Json<PriceTable>, AppError> {
    let provider: Provider = provider.parse()?;
    Ok(Json(state.pricing.compute_pricing(provider, &region).await?))
}

pub async fn storage(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Json<PriceTable>, AppError> {
    let provider: Provider = provider.parse()?;
    Ok(Json(state.pricing.storage_pricing(provider).await?))
}

pub async fn database(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Json<PriceTable>, AppError> {
    let provider: Provider = provider.parse()?;
    Ok(Json(state.pricing.database_pricing(provider).await?))
}
