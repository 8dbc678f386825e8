use axum::Router;
use domain_estimates::{EstimateService, PgEstimateRepository, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgEstimateRepository::new(state.db.clone());
    let service = EstimateService::new(repository);
    handlers::router(service)
}
