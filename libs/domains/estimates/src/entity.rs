use crate::error::{EstimateError, EstimateResult};
use crate::models::{Estimate, EstimateKind, EstimateStatus, ProjectType, ServiceType};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the estimates table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "estimates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_name: String,
    pub client_name: String,
    pub client_email: String,
    pub status: EstimateStatus,
    pub estimate_kind: EstimateKind,
    pub project_type: ProjectType,
    pub estimated_duration_days: i32,
    pub service_type: ServiceType,
    pub estimated_hours: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub per_visit_cost: Decimal,
    pub visits_per_month: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub material_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub equipment_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub travel_cost: Decimal,
    pub is_recurring: bool,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub distance_from_base: Decimal,
    pub client_tier: String,
    pub is_rush_order: bool,
    pub is_repeat_client: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub selected_packages: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub selected_add_ons: Json,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub total_estimated_cost: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub monthly_estimated_cost: Option<Decimal>,
    #[sea_orm(column_type = "JsonBinary")]
    pub breakdown: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub const URL: &'static str = "/estimates";
    pub const TAG: &'static str = "Estimates";
}

fn corrupt(column: &str, err: serde_json::Error) -> EstimateError {
    EstimateError::Internal(format!("Malformed {} column: {}", column, err))
}

// Conversion from Sea-ORM Model to domain Estimate
impl TryFrom<Model> for Estimate {
    type Error = EstimateError;

    fn try_from(model: Model) -> EstimateResult<Self> {
        Ok(Self {
            id: model.id,
            project_name: model.project_name,
            client_name: model.client_name,
            client_email: model.client_email,
            status: model.status,
            estimate_kind: model.estimate_kind,
            project_type: model.project_type,
            estimated_duration_days: model.estimated_duration_days,
            service_type: model.service_type,
            estimated_hours: model.estimated_hours,
            per_visit_cost: model.per_visit_cost,
            visits_per_month: model.visits_per_month,
            material_cost: model.material_cost,
            equipment_cost: model.equipment_cost,
            travel_cost: model.travel_cost,
            is_recurring: model.is_recurring,
            distance_from_base: model.distance_from_base,
            client_tier: model.client_tier,
            is_rush_order: model.is_rush_order,
            is_repeat_client: model.is_repeat_client,
            selected_packages: serde_json::from_value(model.selected_packages)
                .map_err(|e| corrupt("selected_packages", e))?,
            selected_add_ons: serde_json::from_value(model.selected_add_ons)
                .map_err(|e| corrupt("selected_add_ons", e))?,
            total_estimated_cost: model.total_estimated_cost,
            monthly_estimated_cost: model.monthly_estimated_cost,
            breakdown: serde_json::from_value(model.breakdown)
                .map_err(|e| corrupt("breakdown", e))?,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

// Conversion from domain Estimate to a fully-set ActiveModel
impl TryFrom<&Estimate> for ActiveModel {
    type Error = EstimateError;

    fn try_from(estimate: &Estimate) -> EstimateResult<Self> {
        let to_json = |column: &str, value: Result<Json, serde_json::Error>| {
            value.map_err(|e| corrupt(column, e))
        };

        Ok(ActiveModel {
            id: Set(estimate.id),
            project_name: Set(estimate.project_name.clone()),
            client_name: Set(estimate.client_name.clone()),
            client_email: Set(estimate.client_email.clone()),
            status: Set(estimate.status),
            estimate_kind: Set(estimate.estimate_kind),
            project_type: Set(estimate.project_type),
            estimated_duration_days: Set(estimate.estimated_duration_days),
            service_type: Set(estimate.service_type),
            estimated_hours: Set(estimate.estimated_hours),
            per_visit_cost: Set(estimate.per_visit_cost),
            visits_per_month: Set(estimate.visits_per_month),
            material_cost: Set(estimate.material_cost),
            equipment_cost: Set(estimate.equipment_cost),
            travel_cost: Set(estimate.travel_cost),
            is_recurring: Set(estimate.is_recurring),
            distance_from_base: Set(estimate.distance_from_base),
            client_tier: Set(estimate.client_tier.clone()),
            is_rush_order: Set(estimate.is_rush_order),
            is_repeat_client: Set(estimate.is_repeat_client),
            selected_packages: Set(to_json(
                "selected_packages",
                serde_json::to_value(&estimate.selected_packages),
            )?),
            selected_add_ons: Set(to_json(
                "selected_add_ons",
                serde_json::to_value(&estimate.selected_add_ons),
            )?),
            total_estimated_cost: Set(estimate.total_estimated_cost),
            monthly_estimated_cost: Set(estimate.monthly_estimated_cost),
            breakdown: Set(to_json("breakdown", serde_json::to_value(&estimate.breakdown))?),
            created_at: Set(estimate.created_at.into()),
            updated_at: Set(estimate.updated_at.into()),
        })
    }
}
