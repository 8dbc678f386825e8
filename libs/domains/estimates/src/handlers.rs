use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestInvalidInputResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::discounts::{AppliedDiscount, DiscountOutcome, DiscountPreview, DiscountRule, DiscountValue};
use crate::entity;
use crate::error::EstimateResult;
use crate::models::{
    CreateEstimate, Estimate, EstimateFilter, EstimateKind, EstimateStatus, ProjectType,
    ServiceType, UpdateEstimate,
};
use crate::pricing::{BillingBasis, PriceBreakdown};
use crate::repository::EstimateRepository;
use crate::service::EstimateService;

/// OpenAPI documentation for Estimates API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_estimates,
        create_estimate,
        get_estimate,
        update_estimate,
        delete_estimate,
        approve_estimate,
        reject_estimate,
        preview_discounts,
    ),
    components(
        schemas(
            Estimate,
            CreateEstimate,
            UpdateEstimate,
            EstimateFilter,
            EstimateKind,
            EstimateStatus,
            ProjectType,
            ServiceType,
            PriceBreakdown,
            BillingBasis,
            DiscountPreview,
            DiscountRule,
            DiscountValue,
            DiscountOutcome,
            AppliedDiscount,
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestInvalidInputResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::Model::TAG, description = "Project estimate pricing and review")
    )
)]
pub struct ApiDoc;

/// Create the estimate router with all HTTP endpoints
pub fn router<R: EstimateRepository + 'static>(service: EstimateService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_estimates).post(create_estimate))
        .route(
            "/{id}",
            get(get_estimate).put(update_estimate).delete(delete_estimate),
        )
        .route("/{id}/approve", post(approve_estimate))
        .route("/{id}/reject", post(reject_estimate))
        .route("/{id}/discounts", post(preview_discounts))
        .with_state(shared_service)
}

/// List estimates with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = entity::Model::TAG,
    params(EstimateFilter),
    responses(
        (status = 200, description = "List of estimates", body = Vec<Estimate>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_estimates<R: EstimateRepository>(
    State(service): State<Arc<EstimateService<R>>>,
    Query(filter): Query<EstimateFilter>,
) -> EstimateResult<Json<Vec<Estimate>>> {
    let estimates = service.list_estimates(filter).await?;
    Ok(Json(estimates))
}

/// Price and store a new estimate
#[utoipa::path(
    post,
    path = "",
    tag = entity::Model::TAG,
    request_body = CreateEstimate,
    responses(
        (status = 201, description = "Estimate priced and created", body = Estimate),
        (status = 400, response = BadRequestInvalidInputResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_estimate<R: EstimateRepository>(
    State(service): State<Arc<EstimateService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateEstimate>,
) -> EstimateResult<impl IntoResponse> {
    let estimate = service.create_estimate(input).await?;

    AuditEvent::new(
        "estimate.create",
        format!("estimate:{}", estimate.id),
        AuditOutcome::Success,
    )
    .with_client(&headers)
    .with_details(json!({
        "estimate_kind": estimate.estimate_kind.to_string(),
        "total_estimated_cost": estimate.total_estimated_cost,
        "monthly_estimated_cost": estimate.monthly_estimated_cost,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(estimate)))
}

/// Get an estimate by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Estimate ID")
    ),
    responses(
        (status = 200, description = "Estimate found", body = Estimate),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_estimate<R: EstimateRepository>(
    State(service): State<Arc<EstimateService<R>>>,
    UuidPath(id): UuidPath,
) -> EstimateResult<Json<Estimate>> {
    let estimate = service.get_estimate(id).await?;
    Ok(Json(estimate))
}

/// Update project and client details; never reprices
#[utoipa::path(
    put,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Estimate ID")
    ),
    request_body = UpdateEstimate,
    responses(
        (status = 200, description = "Estimate updated successfully", body = Estimate),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_estimate<R: EstimateRepository>(
    State(service): State<Arc<EstimateService<R>>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateEstimate>,
) -> EstimateResult<Json<Estimate>> {
    let estimate = service.update_estimate(id, input).await?;

    AuditEvent::new("estimate.update", format!("estimate:{}", id), AuditOutcome::Success)
        .with_client(&headers)
        .log();

    Ok(Json(estimate))
}

/// Delete an estimate
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Estimate ID")
    ),
    responses(
        (status = 204, description = "Estimate deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_estimate<R: EstimateRepository>(
    State(service): State<Arc<EstimateService<R>>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> EstimateResult<impl IntoResponse> {
    service.delete_estimate(id).await?;

    AuditEvent::new("estimate.delete", format!("estimate:{}", id), AuditOutcome::Success)
        .with_client(&headers)
        .log();

    Ok(StatusCode::NO_CONTENT)
}

/// Approve a draft estimate
#[utoipa::path(
    post,
    path = "/{id}/approve",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Estimate ID")
    ),
    responses(
        (status = 200, description = "Estimate approved", body = Estimate),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn approve_estimate<R: EstimateRepository>(
    State(service): State<Arc<EstimateService<R>>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> EstimateResult<Json<Estimate>> {
    let estimate = service.approve_estimate(id).await?;

    AuditEvent::new("estimate.approve", format!("estimate:{}", id), AuditOutcome::Success)
        .with_client(&headers)
        .log();

    Ok(Json(estimate))
}

/// Reject a draft estimate
#[utoipa::path(
    post,
    path = "/{id}/reject",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Estimate ID")
    ),
    responses(
        (status = 200, description = "Estimate rejected", body = Estimate),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn reject_estimate<R: EstimateRepository>(
    State(service): State<Arc<EstimateService<R>>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> EstimateResult<Json<Estimate>> {
    let estimate = service.reject_estimate(id).await?;

    AuditEvent::new("estimate.reject", format!("estimate:{}", id), AuditOutcome::Success)
        .with_client(&headers)
        .log();

    Ok(Json(estimate))
}

/// Preview a discount rule set against a stored estimate
///
/// Nothing is persisted; the estimate keeps its priced totals.
#[utoipa::path(
    post,
    path = "/{id}/discounts",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Estimate ID")
    ),
    request_body = DiscountPreview,
    responses(
        (status = 200, description = "Discount evaluation", body = DiscountOutcome),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn preview_discounts<R: EstimateRepository>(
    State(service): State<Arc<EstimateService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<DiscountPreview>,
) -> EstimateResult<Json<DiscountOutcome>> {
    let outcome = service.preview_discounts(id, input).await?;
    Ok(Json(outcome))
}
