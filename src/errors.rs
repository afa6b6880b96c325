use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Provider, ResourceKind};

/// Failures raised while pricing a workload.
#[derive(Debug, Error)]
pub enum CostError {
    /// The provider dataset exists but has no entry for the requested SKU.
    #[error("no {kind} pricing for '{resource}' on {provider} ({region})")]
    PricingNotFound {
        provider: Provider,
        kind: ResourceKind,
        region: String,
        resource: String,
    },

    #[error("provider '{0}' has no pricing source")]
    ProviderUnsupported(String),

    #[error("pricing upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub body: ApiError,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ApiError {
                code: "BAD_REQUEST".into(),
                message: msg.into(),
                details: None,
            },
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ApiError {
                code: "NOT_FOUND".into(),
                message: format!("{resource} '{id}' not found"),
                details: None,
            },
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ApiError {
                code: "INTERNAL_ERROR".into(),
                message: msg.into(),
                details: None,
            },
        }
    }

    pub fn service_unavailable(service: &str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: ApiError {
                code: "SERVICE_UNAVAILABLE".into(),
                message: format!("{service} is currently unavailable"),
                details: None,
            },
        }
    }
}

impl AppError {
    /// Log a pricing failure and hide it behind `message`. An unreachable
    /// upstream still reports as unavailable.
    pub fn pricing_failure(err: CostError, message: &str) -> Self {
        tracing::error!(error = %err, "{message}");
        match err {
            CostError::UpstreamUnavailable(_) => Self::service_unavailable("Pricing service"),
            _ => Self::internal(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<CostError> for AppError {
    fn from(err: CostError) -> Self {
        tracing::error!("Pricing error: {err}");
        match err {
            CostError::ProviderUnsupported(provider) => Self::not_found("Provider", &provider),
            CostError::UpstreamUnavailable(_) => Self::service_unavailable("Pricing service"),
            CostError::PricingNotFound { .. } => Self::internal("Pricing data unavailable"),
        }
    }
}
