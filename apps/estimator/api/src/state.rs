//! Shared application state passed to readiness handlers and domain routers.

/// Cloned per handler; the connection is a pool handle, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
}
