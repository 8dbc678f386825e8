//! Estimates Domain
//!
//! Prices project estimates and manages their review lifecycle.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐      ┌───────────┐
//! │   Service   │ ───▶ │  Pricing  │  ← pure, per-kind rules
//! └──────┬──────┘      ├───────────┤
//!        │             │ Discounts │  ← data-driven rule engine
//! ┌──────▼──────┐      └───────────┘
//! │ Repository  │  ← Data access (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, enums
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_estimates::{
//!     handlers,
//!     repository::InMemoryEstimateRepository,
//!     service::EstimateService,
//! };
//!
//! let repository = InMemoryEstimateRepository::new();
//! let service = EstimateService::new(repository);
//!
//! let router = handlers::router(service);
//! ```

pub mod discounts;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod pricing;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use discounts::{DiscountOutcome, DiscountPreview, DiscountRule, DiscountValue};
pub use error::{EstimateError, EstimateResult};
pub use models::{
    CreateEstimate, Estimate, EstimateFilter, EstimateKind, EstimateStatus, ProjectType,
    ServiceType, UpdateEstimate,
};
pub use postgres::PgEstimateRepository;
pub use pricing::{EstimateRequest, PriceBreakdown, PricedEstimate, PricingError, price};
pub use repository::{EstimateRepository, InMemoryEstimateRepository};
pub use service::EstimateService;
