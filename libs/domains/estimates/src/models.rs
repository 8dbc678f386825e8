use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::pricing::{PriceBreakdown, PricedEstimate};

/// Top-level category of an estimate; selects the pricing rules
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "estimate_kind")]
pub enum EstimateKind {
    #[sea_orm(string_value = "design_build")]
    DesignBuild,
    #[sea_orm(string_value = "recurring_service")]
    RecurringService,
    #[sea_orm(string_value = "on_demand")]
    OnDemand,
}

/// Seasonal/urgency modifier scaling DesignBuild prices
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "project_type")]
pub enum ProjectType {
    #[default]
    #[sea_orm(string_value = "standard")]
    Standard,
    #[sea_orm(string_value = "custom")]
    Custom,
    #[sea_orm(string_value = "peak")]
    Peak,
    #[sea_orm(string_value = "off_season")]
    OffSeason,
    #[sea_orm(string_value = "rush")]
    Rush,
    #[sea_orm(string_value = "emergency")]
    Emergency,
}

impl ProjectType {
    /// Unrecognised labels price as `Standard`.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

/// Labor category for recurring work; selects the hourly rate
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "service_type")]
pub enum ServiceType {
    #[default]
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
    #[sea_orm(string_value = "repair")]
    Repair,
    #[sea_orm(string_value = "installation")]
    Installation,
    #[sea_orm(string_value = "consultation")]
    Consultation,
}

impl ServiceType {
    /// Unrecognised labels price as `Maintenance`.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

/// Review state of an estimate
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "estimate_status")]
pub enum EstimateStatus {
    #[default]
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl EstimateStatus {
    /// Only drafts move; approved and rejected are terminal.
    pub fn can_transition_to(self, target: EstimateStatus) -> bool {
        matches!(
            (self, target),
            (EstimateStatus::Draft, EstimateStatus::Approved)
                | (EstimateStatus::Draft, EstimateStatus::Rejected)
        )
    }
}

/// A priced, persisted project estimate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    /// Unique identifier
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
    #[schema(example = "0")]
    pub per_visit_cost: Decimal,
    pub visits_per_month: i32,
    #[schema(example = "50")]
    pub material_cost: Decimal,
    #[schema(example = "25")]
    pub equipment_cost: Decimal,
    #[schema(example = "15")]
    pub travel_cost: Decimal,
    pub is_recurring: bool,
    #[schema(example = "0")]
    pub distance_from_base: Decimal,
    /// Discount context: client tier label
    pub client_tier: String,
    pub is_rush_order: bool,
    pub is_repeat_client: bool,
    pub selected_packages: Vec<String>,
    pub selected_add_ons: Vec<String>,
    /// Set for DesignBuild and OnDemand
    #[schema(example = "3750")]
    pub total_estimated_cost: Option<Decimal>,
    /// Set for RecurringService
    pub monthly_estimated_cost: Option<Decimal>,
    pub breakdown: PriceBreakdown,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating (and pricing) a new estimate
///
/// `estimateKind`, `projectType` and `serviceType` arrive as free text:
/// an unknown kind is rejected, unknown type labels fall back to defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEstimate {
    #[validate(length(min = 1, max = 200))]
    pub project_name: String,
    #[validate(length(min = 1, max = 150))]
    pub client_name: String,
    #[validate(email, length(max = 320))]
    pub client_email: String,
    #[schema(example = "DesignBuild")]
    pub estimate_kind: String,
    #[serde(default)]
    #[schema(example = "Standard")]
    pub project_type: Option<String>,
    #[serde(default)]
    pub estimated_duration_days: i32,
    #[serde(default)]
    #[schema(example = "Maintenance")]
    pub service_type: Option<String>,
    #[serde(default)]
    pub estimated_hours: i32,
    #[serde(default)]
    pub per_visit_cost: Decimal,
    #[serde(default)]
    pub visits_per_month: i32,
    #[serde(default)]
    pub material_cost: Decimal,
    #[serde(default)]
    pub equipment_cost: Decimal,
    #[serde(default)]
    pub travel_cost: Decimal,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub distance_from_base: Decimal,
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub client_tier: Option<String>,
    #[serde(default)]
    pub is_rush_order: bool,
    #[serde(default)]
    pub is_repeat_client: bool,
    #[serde(default)]
    pub selected_packages: Vec<String>,
    #[serde(default)]
    pub selected_add_ons: Vec<String>,
}

/// DTO for updating descriptive fields; pricing inputs are immutable
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEstimate {
    #[validate(length(min = 1, max = 200))]
    pub project_name: Option<String>,
    #[validate(length(min = 1, max = 150))]
    pub client_name: Option<String>,
    #[validate(email, length(max = 320))]
    pub client_email: Option<String>,
}

/// Query filters for listing estimates
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct EstimateFilter {
    pub estimate_kind: Option<EstimateKind>,
    pub status: Option<EstimateStatus>,
    pub client_email: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for EstimateFilter {
    fn default() -> Self {
        Self {
            estimate_kind: None,
            status: None,
            client_email: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl EstimateFilter {
    pub fn matches(&self, estimate: &Estimate) -> bool {
        if let Some(kind) = self.estimate_kind {
            if estimate.estimate_kind != kind {
                return false;
            }
        }
        if let Some(status) = self.status {
            if estimate.status != status {
                return false;
            }
        }
        if let Some(ref email) = self.client_email {
            if estimate.client_email != *email {
                return false;
            }
        }
        true
    }
}

const DEFAULT_CLIENT_TIER: &str = "Standard";

impl Estimate {
    /// Build a draft estimate from the create DTO and its pricing result
    pub fn new(input: CreateEstimate, priced: PricedEstimate) -> Self {
        let now = Utc::now();
        let request = priced.request;

        Self {
            id: Uuid::now_v7(),
            project_name: input.project_name,
            client_name: input.client_name,
            client_email: input.client_email,
            status: EstimateStatus::Draft,
            estimate_kind: request.kind,
            project_type: request.project_type,
            estimated_duration_days: request.estimated_duration_days,
            service_type: request.service_type,
            estimated_hours: request.estimated_hours,
            per_visit_cost: request.per_visit_cost,
            visits_per_month: request.visits_per_month,
            material_cost: request.material_cost,
            equipment_cost: request.equipment_cost,
            travel_cost: request.travel_cost,
            is_recurring: request.is_recurring,
            distance_from_base: request.distance_from_base,
            client_tier: input
                .client_tier
                .unwrap_or_else(|| DEFAULT_CLIENT_TIER.to_string()),
            is_rush_order: input.is_rush_order,
            is_repeat_client: input.is_repeat_client,
            selected_packages: input.selected_packages,
            selected_add_ons: input.selected_add_ons,
            total_estimated_cost: priced.total_estimated_cost,
            monthly_estimated_cost: priced.monthly_estimated_cost,
            breakdown: priced.breakdown,
            created_at: now,
            updated_at: now,
        }
    }

    /// The priced amount regardless of kind (monthly for recurring work)
    pub fn priced_amount(&self) -> Decimal {
        self.total_estimated_cost
            .or(self.monthly_estimated_cost)
            .unwrap_or(Decimal::ZERO)
    }

    /// Apply updates from UpdateEstimate DTO
    pub fn apply_update(&mut self, update: UpdateEstimate) {
        if let Some(project_name) = update.project_name {
            self.project_name = project_name;
        }
        if let Some(client_name) = update.client_name {
            self.client_name = client_name;
        }
        if let Some(client_email) = update.client_email {
            self.client_email = client_email;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_project_type_defaults_to_standard() {
        assert_eq!(ProjectType::from_label("OffSeason"), ProjectType::OffSeason);
        assert_eq!(ProjectType::from_label("Seasonal"), ProjectType::Standard);
        assert_eq!(ProjectType::from_label(""), ProjectType::Standard);
    }

    #[test]
    fn test_unknown_service_type_defaults_to_maintenance() {
        assert_eq!(ServiceType::from_label("Repair"), ServiceType::Repair);
        assert_eq!(ServiceType::from_label("landscaping"), ServiceType::Maintenance);
    }

    #[test]
    fn test_kind_parses_exact_labels_only() {
        assert_eq!("OnDemand".parse::<EstimateKind>().ok(), Some(EstimateKind::OnDemand));
        assert!("Invalid".parse::<EstimateKind>().is_err());
        assert!("".parse::<EstimateKind>().is_err());
    }

    #[test]
    fn test_status_transitions() {
        use EstimateStatus::*;

        assert!(Draft.can_transition_to(Approved));
        assert!(Draft.can_transition_to(Rejected));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Approved.can_transition_to(Draft));
    }

    #[test]
    fn test_create_estimate_uses_camel_case_and_defaults() {
        let input: CreateEstimate = serde_json::from_value(serde_json::json!({
            "projectName": "Backyard",
            "clientName": "Dana",
            "clientEmail": "dana@example.com",
            "estimateKind": "OnDemand",
            "distanceFromBase": 20
        }))
        .unwrap();

        assert_eq!(input.estimate_kind, "OnDemand");
        assert_eq!(input.distance_from_base, Decimal::from(20));
        assert_eq!(input.estimated_hours, 0);
        assert!(input.project_type.is_none());
        assert!(input.selected_packages.is_empty());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_create_estimate_rejects_bad_email() {
        let input: CreateEstimate = serde_json::from_value(serde_json::json!({
            "projectName": "Backyard",
            "clientName": "Dana",
            "clientEmail": "not-an-email",
            "estimateKind": "OnDemand"
        }))
        .unwrap();

        assert!(input.validate().is_err());
    }

    fn sample_estimate() -> Estimate {
        let input: CreateEstimate = serde_json::from_value(serde_json::json!({
            "projectName": "Patio",
            "clientName": "Dana",
            "clientEmail": "dana@example.com",
            "estimateKind": "DesignBuild",
            "estimatedDurationDays": 20
        }))
        .unwrap();
        let request = crate::pricing::EstimateRequest::try_from(&input).unwrap();
        let priced = crate::pricing::price(request).unwrap();
        Estimate::new(input, priced)
    }

    #[test]
    fn test_new_estimate_is_draft_with_default_tier() {
        let estimate = sample_estimate();

        assert_eq!(estimate.status, EstimateStatus::Draft);
        assert_eq!(estimate.client_tier, "Standard");
        assert_eq!(estimate.estimate_kind, EstimateKind::DesignBuild);
        assert_eq!(estimate.priced_amount(), Decimal::from(3750));
        assert!(estimate.monthly_estimated_cost.is_none());
    }

    #[test]
    fn test_filter_matches_email() {
        let filter = EstimateFilter {
            client_email: Some("dana@example.com".to_string()),
            ..Default::default()
        };
        let mut estimate = sample_estimate();
        estimate.client_email = "dana@example.com".to_string();

        assert!(filter.matches(&estimate));
        estimate.client_email = "someone@example.com".to_string();
        assert!(!filter.matches(&estimate));
    }
}
