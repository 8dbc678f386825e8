use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::EstimateStatus;
use crate::pricing::PricingError;

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("Estimate not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid EstimateKind: {0}")]
    InvalidKind(String),

    #[error("{field} {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Cannot move estimate {id} from {from} to {to}")]
    InvalidTransition {
        id: Uuid,
        from: EstimateStatus,
        to: EstimateStatus,
    },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EstimateResult<T> = Result<T, EstimateError>;

impl From<PricingError> for EstimateError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidKind(value) => EstimateError::InvalidKind(value),
            PricingError::InvalidInput { field, reason } => {
                EstimateError::InvalidInput { field, reason }
            }
        }
    }
}

/// Convert EstimateError to AppError for standardized error responses
impl From<EstimateError> for AppError {
    fn from(err: EstimateError) -> Self {
        match err {
            EstimateError::NotFound(id) => AppError::NotFound(format!("Estimate {} not found", id)),
            EstimateError::InvalidKind(_) => AppError::BadRequest(err.to_string()),
            EstimateError::InvalidInput { field, ref reason } => AppError::InvalidInput {
                message: err.to_string(),
                details: Some(json!({ "field": field, "reason": reason })),
            },
            EstimateError::Validation(msg) => AppError::BadRequest(msg),
            EstimateError::InvalidTransition { from, to, .. } => AppError::Conflict(format!(
                "Estimate is {} and cannot become {}",
                from, to
            )),
            EstimateError::Database(e) => AppError::Database(e),
            EstimateError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for EstimateError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = [
            (EstimateError::NotFound(Uuid::now_v7()), StatusCode::NOT_FOUND),
            (EstimateError::InvalidKind("Invalid".into()), StatusCode::BAD_REQUEST),
            (
                EstimateError::InvalidInput {
                    field: "travelCost",
                    reason: "must not be negative".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (EstimateError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                EstimateError::InvalidTransition {
                    id: Uuid::now_v7(),
                    from: EstimateStatus::Rejected,
                    to: EstimateStatus::Approved,
                },
                StatusCode::CONFLICT,
            ),
            (EstimateError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            let label = err.to_string();
            assert_eq!(err.into_response().status(), status, "{label}");
        }
    }

    #[test]
    fn test_pricing_errors_keep_their_payload() {
        let err: EstimateError = PricingError::InvalidKind("Hourly".into()).into();
        assert_eq!(err.to_string(), "Invalid EstimateKind: Hourly");

        let err: EstimateError = PricingError::InvalidInput {
            field: "estimatedHours",
            reason: "must not be negative".into(),
        }
        .into();
        assert_eq!(err.to_string(), "estimatedHours must not be negative");
    }
}
