use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::discounts::{self, DiscountContext, DiscountOutcome, DiscountPreview};
use crate::error::{EstimateError, EstimateResult};
use crate::models::{CreateEstimate, Estimate, EstimateFilter, EstimateStatus, UpdateEstimate};
use crate::pricing::{self, EstimateRequest};
use crate::repository::EstimateRepository;

/// Upper bound on a single list page
pub const MAX_PAGE_SIZE: usize = 200;

/// Service layer for Estimate business logic
#[derive(Clone)]
pub struct EstimateService<R: EstimateRepository> {
    repository: Arc<R>,
}

impl<R: EstimateRepository> EstimateService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate, price and persist a new estimate
    pub async fn create_estimate(&self, input: CreateEstimate) -> EstimateResult<Estimate> {
        input
            .validate()
            .map_err(|e| EstimateError::Validation(e.to_string()))?;

        let request = EstimateRequest::try_from(&input)?;
        let priced = pricing::price(request)?;

        self.repository.create(Estimate::new(input, priced)).await
    }

    /// Get an estimate by ID
    pub async fn get_estimate(&self, id: Uuid) -> EstimateResult<Estimate> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(EstimateError::NotFound(id))
    }

    /// List estimates with filters
    pub async fn list_estimates(&self, mut filter: EstimateFilter) -> EstimateResult<Vec<Estimate>> {
        filter.limit = filter.limit.min(MAX_PAGE_SIZE);
        self.repository.list(filter).await
    }

    /// Update descriptive fields; pricing is left untouched
    pub async fn update_estimate(&self, id: Uuid, input: UpdateEstimate) -> EstimateResult<Estimate> {
        input
            .validate()
            .map_err(|e| EstimateError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Delete an estimate
    pub async fn delete_estimate(&self, id: Uuid) -> EstimateResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(EstimateError::NotFound(id));
        }

        Ok(())
    }

    /// Approve a draft (no-op when already approved)
    pub async fn approve_estimate(&self, id: Uuid) -> EstimateResult<Estimate> {
        self.transition(id, EstimateStatus::Approved).await
    }

    /// Reject a draft (no-op when already rejected)
    pub async fn reject_estimate(&self, id: Uuid) -> EstimateResult<Estimate> {
        self.transition(id, EstimateStatus::Rejected).await
    }

    async fn transition(&self, id: Uuid, target: EstimateStatus) -> EstimateResult<Estimate> {
        let estimate = self.get_estimate(id).await?;

        if estimate.status == target {
            return Ok(estimate);
        }

        if !estimate.status.can_transition_to(target) {
            return Err(EstimateError::InvalidTransition {
                id,
                from: estimate.status,
                to: target,
            });
        }

        self.repository.set_status(id, target).await
    }

    /// Evaluate discount rules against a stored estimate without persisting anything
    pub async fn preview_discounts(
        &self,
        id: Uuid,
        input: DiscountPreview,
    ) -> EstimateResult<DiscountOutcome> {
        input
            .validate()
            .map_err(|e| EstimateError::Validation(e.to_string()))?;

        let estimate = self.get_estimate(id).await?;
        let at = input.evaluated_at.unwrap_or_else(Utc::now);
        let ctx = DiscountContext::for_estimate(&estimate, at);

        Ok(discounts::evaluate(&input.rules, &ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discounts::{DiscountRule, DiscountValue};
    use crate::models::EstimateKind;
    use crate::repository::MockEstimateRepository;
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;

    fn create_input(kind: &str) -> CreateEstimate {
        serde_json::from_value(serde_json::json!({
            "projectName": "Pond",
            "clientName": "Alex",
            "clientEmail": "alex@example.com",
            "estimateKind": kind,
            "serviceType": "Maintenance",
            "estimatedHours": 8,
            "materialCost": 50,
            "equipmentCost": 25,
            "travelCost": 15,
            "isRecurring": true
        }))
        .unwrap()
    }

    fn stored(status: EstimateStatus) -> Estimate {
        let input = create_input("RecurringService");
        let request = EstimateRequest::try_from(&input).unwrap();
        let mut estimate = Estimate::new(input, pricing::price(request).unwrap());
        estimate.status = status;
        estimate
    }

    #[tokio::test]
    async fn test_create_prices_before_persisting() {
        let mut mock_repo = MockEstimateRepository::new();
        mock_repo
            .expect_create()
            .withf(|e| {
                e.estimate_kind == EstimateKind::RecurringService
                    && e.monthly_estimated_cost == Some(dec!(621))
                    && e.status == EstimateStatus::Draft
            })
            .times(1)
            .returning(Ok);

        let service = EstimateService::new(mock_repo);
        let estimate = service.create_estimate(create_input("RecurringService")).await.unwrap();

        assert_eq!(estimate.monthly_estimated_cost, Some(dec!(621)));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_kind_without_persisting() {
        let mut mock_repo = MockEstimateRepository::new();
        mock_repo.expect_create().never();

        let service = EstimateService::new(mock_repo);
        let result = service.create_estimate(create_input("Invalid")).await;

        assert!(matches!(result, Err(EstimateError::InvalidKind(kind)) if kind == "Invalid"));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_costs() {
        let mut mock_repo = MockEstimateRepository::new();
        mock_repo.expect_create().never();

        let mut input = create_input("RecurringService");
        input.equipment_cost = dec!(-1);

        let service = EstimateService::new(mock_repo);
        let result = service.create_estimate(input).await;

        assert!(matches!(
            result,
            Err(EstimateError::InvalidInput { field: "equipmentCost", .. })
        ));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut mock_repo = MockEstimateRepository::new();
        let id = Uuid::now_v7();
        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let service = EstimateService::new(mock_repo);
        assert!(matches!(
            service.get_estimate(id).await,
            Err(EstimateError::NotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn test_list_caps_page_size() {
        let mut mock_repo = MockEstimateRepository::new();
        mock_repo
            .expect_list()
            .withf(|f| f.limit == MAX_PAGE_SIZE)
            .returning(|_| Ok(vec![]));

        let service = EstimateService::new(mock_repo);
        let filter = EstimateFilter {
            limit: 10_000,
            ..Default::default()
        };
        assert!(service.list_estimates(filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut mock_repo = MockEstimateRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(false));

        let service = EstimateService::new(mock_repo);
        assert!(matches!(
            service.delete_estimate(Uuid::now_v7()).await,
            Err(EstimateError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_approve_draft() {
        let estimate = stored(EstimateStatus::Draft);
        let id = estimate.id;

        let mut mock_repo = MockEstimateRepository::new();
        let found = estimate.clone();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        mock_repo
            .expect_set_status()
            .with(eq(id), eq(EstimateStatus::Approved))
            .times(1)
            .returning(move |_, status| {
                let mut updated = estimate.clone();
                updated.status = status;
                Ok(updated)
            });

        let service = EstimateService::new(mock_repo);
        let approved = service.approve_estimate(id).await.unwrap();
        assert_eq!(approved.status, EstimateStatus::Approved);
    }

    #[tokio::test]
    async fn test_approve_is_idempotent() {
        let estimate = stored(EstimateStatus::Approved);

        let mut mock_repo = MockEstimateRepository::new();
        let found = estimate.clone();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        mock_repo.expect_set_status().never();

        let service = EstimateService::new(mock_repo);
        let approved = service.approve_estimate(estimate.id).await.unwrap();
        assert_eq!(approved.status, EstimateStatus::Approved);
    }

    #[tokio::test]
    async fn test_reject_after_approve_conflicts() {
        let estimate = stored(EstimateStatus::Approved);

        let mut mock_repo = MockEstimateRepository::new();
        let found = estimate.clone();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        mock_repo.expect_set_status().never();

        let service = EstimateService::new(mock_repo);
        let result = service.reject_estimate(estimate.id).await;

        assert!(matches!(
            result,
            Err(EstimateError::InvalidTransition {
                from: EstimateStatus::Approved,
                to: EstimateStatus::Rejected,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_preview_discounts_uses_stored_total() {
        let estimate = stored(EstimateStatus::Draft);

        let mut mock_repo = MockEstimateRepository::new();
        let found = estimate.clone();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(found.clone())));

        let rule: DiscountRule = serde_json::from_value(serde_json::json!({
            "id": "loyal",
            "name": "Loyalty",
            "discountType": "FixedAmount",
            "discountAmount": 21
        }))
        .unwrap();
        assert_eq!(rule.value, DiscountValue::FixedAmount { amount: dec!(21) });

        let service = EstimateService::new(mock_repo);
        let outcome = service
            .preview_discounts(
                estimate.id,
                DiscountPreview {
                    rules: vec![rule],
                    evaluated_at: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.subtotal, dec!(621));
        assert_eq!(outcome.final_price, dec!(600));
    }
}
