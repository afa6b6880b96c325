pub mod costs;
pub mod health;
pub mod pricing;
pub mod recommendations;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::engine::CostEngine;
use crate::pricing::PricingSource;

/// Shared application state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: CostEngine,
    pub pricing: Arc<dyn PricingSource>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        // Costs
        .route("/api/v1/costs/calculate", post(costs::calculate))
        .route("/api/v1/costs/compare", post(costs::compare))
        // Recommendations
        .route("/api/v1/recommendations/generate", post(recommendations::generate))
        // Pricing
        .route("/api/v1/pricing/compute/:provider/:region", get(pricing::compute))
        .route("/api/v1/pricing/storage/:provider", get(pricing::storage))
        .route("/api/v1/pricing/database/:provider", get(pricing::database))
        .with_state(state)
}
