use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{EstimateError, EstimateResult},
    models::{Estimate, EstimateFilter, EstimateStatus, UpdateEstimate},
    repository::EstimateRepository,
};

pub struct PgEstimateRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgEstimateRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    async fn find_model(&self, id: Uuid) -> EstimateResult<entity::Model> {
        self.base
            .find_by_id(id)
            .await?
            .ok_or(EstimateError::NotFound(id))
    }
}

#[async_trait]
impl EstimateRepository for PgEstimateRepository {
    async fn create(&self, estimate: Estimate) -> EstimateResult<Estimate> {
        let active_model = entity::ActiveModel::try_from(&estimate)?;
        let model = self.base.insert(active_model).await?;

        tracing::info!(estimate_id = %model.id, kind = %model.estimate_kind, "Created estimate");
        model.try_into()
    }

    async fn get_by_id(&self, id: Uuid) -> EstimateResult<Option<Estimate>> {
        self.base
            .find_by_id(id)
            .await?
            .map(Estimate::try_from)
            .transpose()
    }

    async fn list(&self, filter: EstimateFilter) -> EstimateResult<Vec<Estimate>> {
        let mut query = entity::Entity::find();

        if let Some(kind) = filter.estimate_kind {
            query = query.filter(entity::Column::EstimateKind.eq(kind));
        }

        if let Some(status) = filter.status {
            query = query.filter(entity::Column::Status.eq(status));
        }

        if let Some(email) = filter.client_email {
            query = query.filter(entity::Column::ClientEmail.eq(email));
        }

        let models = query
            .order_by_desc(entity::Column::CreatedAt)
            .order_by_desc(entity::Column::Id)
            .limit(filter.limit as u64)
            .offset(filter.offset as u64)
            .all(self.base.db())
            .await?;

        models.into_iter().map(Estimate::try_from).collect()
    }

    async fn update(&self, id: Uuid, input: UpdateEstimate) -> EstimateResult<Estimate> {
        let mut active_model = self.find_model(id).await?.into_active_model();

        if let Some(project_name) = input.project_name {
            active_model.project_name = Set(project_name);
        }
        if let Some(client_name) = input.client_name {
            active_model.client_name = Set(client_name);
        }
        if let Some(client_email) = input.client_email {
            active_model.client_email = Set(client_email);
        }
        active_model.updated_at = Set(Utc::now().into());

        let model = self.base.update(active_model).await?;

        tracing::info!(estimate_id = %id, "Updated estimate");
        model.try_into()
    }

    async fn set_status(&self, id: Uuid, status: EstimateStatus) -> EstimateResult<Estimate> {
        let mut active_model = self.find_model(id).await?.into_active_model();
        active_model.status = Set(status);
        active_model.updated_at = Set(Utc::now().into());

        let model = self.base.update(active_model).await?;

        tracing::info!(estimate_id = %id, status = %status, "Changed estimate status");
        model.try_into()
    }

    async fn delete(&self, id: Uuid) -> EstimateResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await?;

        if rows_affected > 0 {
            tracing::info!(estimate_id = %id, "Deleted estimate");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EstimateKind, ProjectType, ServiceType};
    use crate::pricing::{BillingBasis, PriceBreakdown};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn row(id: Uuid, status: EstimateStatus) -> entity::Model {
        let now = Utc::now();
        entity::Model {
            id,
            project_name: "Driveway".to_string(),
            client_name: "Sam".to_string(),
            client_email: "sam@example.com".to_string(),
            status,
            estimate_kind: EstimateKind::DesignBuild,
            project_type: ProjectType::Custom,
            estimated_duration_days: 45,
            service_type: ServiceType::Maintenance,
            estimated_hours: 0,
            per_visit_cost: Decimal::ZERO,
            visits_per_month: 0,
            material_cost: Decimal::ZERO,
            equipment_cost: Decimal::ZERO,
            travel_cost: Decimal::ZERO,
            is_recurring: false,
            distance_from_base: Decimal::ZERO,
            client_tier: "Standard".to_string(),
            is_rush_order: false,
            is_repeat_client: true,
            selected_packages: serde_json::json!(["Paving"]),
            selected_add_ons: serde_json::json!([]),
            total_estimated_cost: Some(dec!(5000)),
            monthly_estimated_cost: None,
            breakdown: serde_json::to_value(PriceBreakdown {
                billing_basis: BillingBasis::DurationTier,
                base_price: dec!(2500),
                multiplier: dec!(2.0),
                ..Default::default()
            })
            .unwrap(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_maps_row() {
        let id = Uuid::now_v7();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(id, EstimateStatus::Draft)]])
            .into_connection();
        let repo = PgEstimateRepository::new(db);

        let estimate = repo.get_by_id(id).await.unwrap().unwrap();

        assert_eq!(estimate.id, id);
        assert_eq!(estimate.selected_packages, vec!["Paving".to_string()]);
        assert_eq!(estimate.breakdown.base_price, dec!(2500));
        assert_eq!(estimate.total_estimated_cost, Some(dec!(5000)));
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgEstimateRepository::new(db);

        assert!(repo.get_by_id(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_is_internal_error() {
        let id = Uuid::now_v7();
        let mut bad = row(id, EstimateStatus::Draft);
        bad.breakdown = serde_json::json!("not a breakdown");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bad]])
            .into_connection();
        let repo = PgEstimateRepository::new(db);

        assert!(matches!(repo.get_by_id(id).await, Err(EstimateError::Internal(_))));
    }

    #[tokio::test]
    async fn test_set_status_returns_updated_row() {
        let id = Uuid::now_v7();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![row(id, EstimateStatus::Draft)],
                vec![row(id, EstimateStatus::Approved)],
            ])
            .into_connection();
        let repo = PgEstimateRepository::new(db);

        let estimate = repo.set_status(id, EstimateStatus::Approved).await.unwrap();
        assert_eq!(estimate.status, EstimateStatus::Approved);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgEstimateRepository::new(db);

        let result = repo.update(Uuid::now_v7(), UpdateEstimate::default()).await;
        assert!(matches!(result, Err(EstimateError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgEstimateRepository::new(db);

        assert!(repo.delete(Uuid::now_v7()).await.unwrap());
        assert!(!repo.delete(Uuid::now_v7()).await.unwrap());
    }
}
