use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EstimateError, EstimateResult};
use crate::models::{Estimate, EstimateFilter, EstimateStatus, UpdateEstimate};

/// Repository trait for Estimate persistence
///
/// Estimates arrive already priced; implementations store them as-is and
/// never reprice.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EstimateRepository: Send + Sync {
    /// Persist a priced estimate
    async fn create(&self, estimate: Estimate) -> EstimateResult<Estimate>;

    /// Get an estimate by ID
    async fn get_by_id(&self, id: Uuid) -> EstimateResult<Option<Estimate>>;

    /// List estimates, newest first
    async fn list(&self, filter: EstimateFilter) -> EstimateResult<Vec<Estimate>>;

    /// Update descriptive fields of an existing estimate
    async fn update(&self, id: Uuid, input: UpdateEstimate) -> EstimateResult<Estimate>;

    /// Overwrite the review status
    async fn set_status(&self, id: Uuid, status: EstimateStatus) -> EstimateResult<Estimate>;

    /// Delete an estimate by ID
    async fn delete(&self, id: Uuid) -> EstimateResult<bool>;
}

/// In-memory implementation of EstimateRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryEstimateRepository {
    estimates: Arc<RwLock<HashMap<Uuid, Estimate>>>,
}

impl InMemoryEstimateRepository {
    pub fn new() -> Self {
        Self {
            estimates: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl EstimateRepository for InMemoryEstimateRepository {
    async fn create(&self, estimate: Estimate) -> EstimateResult<Estimate> {
        let mut estimates = self.estimates.write().await;
        estimates.insert(estimate.id, estimate.clone());

        tracing::info!(estimate_id = %estimate.id, kind = %estimate.estimate_kind, "Created estimate");
        Ok(estimate)
    }

    async fn get_by_id(&self, id: Uuid) -> EstimateResult<Option<Estimate>> {
        let estimates = self.estimates.read().await;
        Ok(estimates.get(&id).cloned())
    }

    async fn list(&self, filter: EstimateFilter) -> EstimateResult<Vec<Estimate>> {
        let estimates = self.estimates.read().await;

        let mut result: Vec<Estimate> = estimates
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();

        // Newest first; v7 ids order ties by creation
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        Ok(result
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }

    async fn update(&self, id: Uuid, input: UpdateEstimate) -> EstimateResult<Estimate> {
        let mut estimates = self.estimates.write().await;
        let estimate = estimates.get_mut(&id).ok_or(EstimateError::NotFound(id))?;

        estimate.apply_update(input);

        tracing::info!(estimate_id = %id, "Updated estimate");
        Ok(estimate.clone())
    }

    async fn set_status(&self, id: Uuid, status: EstimateStatus) -> EstimateResult<Estimate> {
        let mut estimates = self.estimates.write().await;
        let estimate = estimates.get_mut(&id).ok_or(EstimateError::NotFound(id))?;

        estimate.status = status;
        estimate.updated_at = chrono::Utc::now();

        tracing::info!(estimate_id = %id, status = %status, "Changed estimate status");
        Ok(estimate.clone())
    }

    async fn delete(&self, id: Uuid) -> EstimateResult<bool> {
        let mut estimates = self.estimates.write().await;

        if estimates.remove(&id).is_some() {
            tracing::info!(estimate_id = %id, "Deleted estimate");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
