//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! - **[`server`]**: router assembly with OpenAPI UIs, health probes, graceful shutdown
//! - **[`http`]**: CORS and security-header middleware
//! - **[`errors`]**: `AppError` and the JSON error body with stable codes
//! - **[`extractors`]**: `UuidPath` and `ValidatedJson`
//! - **[`audit`]**: audit events on the `audit` tracing target

pub mod audit;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse, error_response};

pub use errors::responses::{
    BadRequestInvalidInputResponse, BadRequestUuidResponse, BadRequestValidationResponse,
    ConflictResponse, InternalServerErrorResponse, NotFoundResponse, ServiceUnavailableResponse,
};

pub use extractors::{UuidPath, ValidatedJson};

pub use audit::{AuditEvent, AuditOutcome};
