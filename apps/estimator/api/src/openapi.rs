use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Estimator API",
        version = "0.1.0",
        description = "Prices project estimates and tracks their review status"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = domain_estimates::entity::Model::URL, api = domain_estimates::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
