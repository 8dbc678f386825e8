//! PostgreSQL plumbing shared by the domain crates.
//!
//! # Features
//!
//! - `postgres` (default): SeaORM connection pool, migrations runner, health
//!   probe and the generic [`BaseRepository`]
//! - `config` (default): `core_config::FromEnv` for [`postgres::PostgresConfig`]
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::{common::RetryConfig, postgres};
//!
//! let config = postgres::PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, Some(RetryConfig::new().with_max_retries(5))).await?;
//! postgres::run_migrations::<migration::Migrator>(&db, "estimator_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "postgres")]
pub mod repository;

pub use common::{DatabaseError, DatabaseResult};

#[cfg(feature = "postgres")]
pub use repository::BaseRepository;
