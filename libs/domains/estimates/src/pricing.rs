//! Estimate pricing engine.
//!
//! [`price`] is a pure function: the same [`EstimateRequest`] always yields the
//! same [`PricedEstimate`], and nothing is shared between calls.
//!
//! | kind             | basis                                                  |
//! |------------------|--------------------------------------------------------|
//! | DesignBuild      | duration tier × project-type multiplier                |
//! | RecurringService | per-visit, or hourly rate + material/equipment/travel  |
//! | OnDemand         | flat call-out fee + travel surcharge past 15 units     |
//!
//! Recurring work billed with `isRecurring` gets 10% off, applied last.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::{CreateEstimate, EstimateKind, ProjectType, ServiceType};

const ON_DEMAND_FEE: Decimal = dec!(150);
const TRAVEL_SURCHARGE: Decimal = dec!(25);
const TRAVEL_SURCHARGE_THRESHOLD: Decimal = dec!(15);
const RECURRING_FACTOR: Decimal = dec!(0.9);

/// Largest amount a `NUMERIC(19,4)` money column holds
pub const MAX_MONEY: Decimal = dec!(999999999999999.9999);
/// Fractional digits a money column keeps
pub const MONEY_SCALE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("Invalid EstimateKind: {0}")]
    InvalidKind(String),

    #[error("{field} {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

/// Everything the engine reads; immutable for the duration of a call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub kind: EstimateKind,
    pub project_type: ProjectType,
    pub estimated_duration_days: i32,
    pub service_type: ServiceType,
    pub estimated_hours: i32,
    pub per_visit_cost: Decimal,
    pub visits_per_month: i32,
    pub material_cost: Decimal,
    pub equipment_cost: Decimal,
    pub travel_cost: Decimal,
    pub is_recurring: bool,
    pub distance_from_base: Decimal,
}

impl EstimateRequest {
    /// A request of `kind` with every numeric input at zero
    pub fn new(kind: EstimateKind) -> Self {
        Self {
            kind,
            project_type: ProjectType::default(),
            estimated_duration_days: 0,
            service_type: ServiceType::default(),
            estimated_hours: 0,
            per_visit_cost: Decimal::ZERO,
            visits_per_month: 0,
            material_cost: Decimal::ZERO,
            equipment_cost: Decimal::ZERO,
            travel_cost: Decimal::ZERO,
            is_recurring: false,
            distance_from_base: Decimal::ZERO,
        }
    }

    fn check_inputs(&self) -> Result<(), PricingError> {
        let counts = [
            ("estimatedDurationDays", self.estimated_duration_days),
            ("estimatedHours", self.estimated_hours),
            ("visitsPerMonth", self.visits_per_month),
        ];
        for (field, value) in counts {
            if value < 0 {
                return Err(negative(field));
            }
        }

        let amounts = [
            ("perVisitCost", self.per_visit_cost),
            ("materialCost", self.material_cost),
            ("equipmentCost", self.equipment_cost),
            ("travelCost", self.travel_cost),
            ("distanceFromBase", self.distance_from_base),
        ];
        for (field, value) in amounts {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(negative(field));
            }
            check_money(field, value)?;
        }

        Ok(())
    }
}

fn negative(field: &'static str) -> PricingError {
    PricingError::InvalidInput {
        field,
        reason: "must not be negative".to_string(),
    }
}

fn too_large(field: &'static str) -> PricingError {
    PricingError::InvalidInput {
        field,
        reason: format!("must not exceed {MAX_MONEY}"),
    }
}

/// Rejects amounts a money column would reject or silently round.
pub(crate) fn check_money(field: &'static str, value: Decimal) -> Result<(), PricingError> {
    if value.abs() > MAX_MONEY {
        return Err(too_large(field));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(PricingError::InvalidInput {
            field,
            reason: format!("must have at most {MONEY_SCALE} decimal places"),
        });
    }
    Ok(())
}

impl TryFrom<&CreateEstimate> for EstimateRequest {
    type Error = PricingError;

    fn try_from(input: &CreateEstimate) -> Result<Self, Self::Error> {
        let kind = input
            .estimate_kind
            .parse::<EstimateKind>()
            .map_err(|_| PricingError::InvalidKind(input.estimate_kind.clone()))?;

        Ok(Self {
            kind,
            project_type: input
                .project_type
                .as_deref()
                .map(ProjectType::from_label)
                .unwrap_or_default(),
            estimated_duration_days: input.estimated_duration_days,
            service_type: input
                .service_type
                .as_deref()
                .map(ServiceType::from_label)
                .unwrap_or_default(),
            estimated_hours: input.estimated_hours,
            per_visit_cost: input.per_visit_cost,
            visits_per_month: input.visits_per_month,
            material_cost: input.material_cost,
            equipment_cost: input.equipment_cost,
            travel_cost: input.travel_cost,
            is_recurring: input.is_recurring,
            distance_from_base: input.distance_from_base,
        })
    }
}

/// How the priced amount was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum BillingBasis {
    #[default]
    DurationTier,
    Hourly,
    PerVisit,
    FlatRate,
}

/// Components of a priced estimate, persisted next to the totals
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub billing_basis: BillingBasis,
    /// Duration tier, per-visit subtotal, or call-out fee
    pub base_price: Decimal,
    pub multiplier: Decimal,
    pub hourly_rate: Option<Decimal>,
    pub labor_cost: Decimal,
    /// Material + equipment + travel
    pub additional_costs: Decimal,
    pub travel_fee: Decimal,
    pub recurring_discount: Decimal,
}

/// Engine output; write-once, reprice with a fresh call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedEstimate {
    pub request: EstimateRequest,
    pub total_estimated_cost: Option<Decimal>,
    pub monthly_estimated_cost: Option<Decimal>,
    pub breakdown: PriceBreakdown,
}

/// Price a request according to its kind.
pub fn price(request: EstimateRequest) -> Result<PricedEstimate, PricingError> {
    request.check_inputs()?;

    let priced = match request.kind {
        EstimateKind::DesignBuild => price_design_build(request),
        EstimateKind::RecurringService => price_recurring_service(request)?,
        EstimateKind::OnDemand => price_on_demand(request),
    };

    tracing::debug!(
        kind = %priced.request.kind,
        basis = ?priced.breakdown.billing_basis,
        total = ?priced.total_estimated_cost,
        monthly = ?priced.monthly_estimated_cost,
        "Priced estimate"
    );

    Ok(priced)
}

/// Inclusive upper bounds, first match wins.
fn duration_base_price(days: i32) -> Decimal {
    match days {
        ..=30 => dec!(3750),
        31..=90 => dec!(2500),
        _ => dec!(1800),
    }
}

impl ProjectType {
    pub fn multiplier(self) -> Decimal {
        match self {
            ProjectType::Standard => dec!(1.0),
            ProjectType::Custom => dec!(2.0),
            ProjectType::Peak => dec!(4.0),
            ProjectType::OffSeason => dec!(0.8),
            ProjectType::Rush => dec!(3.2),
            ProjectType::Emergency => dec!(4.8),
        }
    }
}

impl ServiceType {
    pub fn hourly_rate(self) -> Decimal {
        match self {
            ServiceType::Maintenance => dec!(75),
            ServiceType::Repair => dec!(95),
            ServiceType::Installation => dec!(120),
            ServiceType::Consultation => dec!(150),
        }
    }
}

pub(crate) fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn price_design_build(request: EstimateRequest) -> PricedEstimate {
    let base_price = duration_base_price(request.estimated_duration_days);
    let multiplier = request.project_type.multiplier();

    PricedEstimate {
        total_estimated_cost: Some(round_money(base_price * multiplier)),
        monthly_estimated_cost: None,
        breakdown: PriceBreakdown {
            billing_basis: BillingBasis::DurationTier,
            base_price,
            multiplier,
            ..Default::default()
        },
        request,
    }
}

fn price_recurring_service(request: EstimateRequest) -> Result<PricedEstimate, PricingError> {
    let per_visit = request.per_visit_cost > Decimal::ZERO && request.visits_per_month > 0;

    let mut breakdown = if per_visit {
        PriceBreakdown {
            billing_basis: BillingBasis::PerVisit,
            base_price: request
                .per_visit_cost
                .checked_mul(Decimal::from(request.visits_per_month))
                .ok_or_else(|| too_large("perVisitCost"))?,
            multiplier: Decimal::ONE,
            ..Default::default()
        }
    } else {
        let rate = request.service_type.hourly_rate();
        PriceBreakdown {
            billing_basis: BillingBasis::Hourly,
            multiplier: Decimal::ONE,
            hourly_rate: Some(rate),
            labor_cost: rate
                .checked_mul(Decimal::from(request.estimated_hours))
                .ok_or_else(|| too_large("estimatedHours"))?,
            additional_costs: request
                .material_cost
                .checked_add(request.equipment_cost)
                .and_then(|sum| sum.checked_add(request.travel_cost))
                .ok_or_else(|| too_large("materialCost"))?,
            ..Default::default()
        }
    };

    let subtotal = breakdown
        .base_price
        .checked_add(breakdown.labor_cost)
        .and_then(|sum| sum.checked_add(breakdown.additional_costs))
        .ok_or_else(|| too_large("monthlyEstimatedCost"))?;
    let monthly = if request.is_recurring {
        let discounted = subtotal * RECURRING_FACTOR;
        breakdown.recurring_discount = round_money(subtotal - discounted);
        discounted
    } else {
        subtotal
    };

    let monthly = round_money(monthly);
    if monthly > MAX_MONEY {
        return Err(too_large("monthlyEstimatedCost"));
    }

    Ok(PricedEstimate {
        total_estimated_cost: None,
        monthly_estimated_cost: Some(monthly),
        breakdown,
        request,
    })
}

fn price_on_demand(request: EstimateRequest) -> PricedEstimate {
    let travel_fee = if request.distance_from_base > TRAVEL_SURCHARGE_THRESHOLD {
        TRAVEL_SURCHARGE
    } else {
        Decimal::ZERO
    };

    PricedEstimate {
        total_estimated_cost: Some(round_money(ON_DEMAND_FEE + travel_fee)),
        monthly_estimated_cost: None,
        breakdown: PriceBreakdown {
            billing_basis: BillingBasis::FlatRate,
            base_price: ON_DEMAND_FEE,
            multiplier: Decimal::ONE,
            travel_fee,
            ..Default::default()
        },
        request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design_build(days: i32, project_type: ProjectType) -> Decimal {
        let request = EstimateRequest {
            estimated_duration_days: days,
            project_type,
            ..EstimateRequest::new(EstimateKind::DesignBuild)
        };
        price(request).unwrap().total_estimated_cost.unwrap()
    }

    fn hourly_maintenance(hours: i32, material: Decimal, equipment: Decimal, travel: Decimal) -> EstimateRequest {
        EstimateRequest {
            service_type: ServiceType::Maintenance,
            estimated_hours: hours,
            material_cost: material,
            equipment_cost: equipment,
            travel_cost: travel,
            ..EstimateRequest::new(EstimateKind::RecurringService)
        }
    }

    fn on_demand(distance: Decimal) -> Decimal {
        let request = EstimateRequest {
            distance_from_base: distance,
            ..EstimateRequest::new(EstimateKind::OnDemand)
        };
        price(request).unwrap().total_estimated_cost.unwrap()
    }

    #[test]
    fn test_design_build_short_standard() {
        for days in [0, 1, 15, 30] {
            assert_eq!(design_build(days, ProjectType::Standard), dec!(3750), "days = {days}");
        }
    }

    #[test]
    fn test_design_build_medium_custom() {
        for days in [31, 60, 90] {
            assert_eq!(design_build(days, ProjectType::Custom), dec!(5000), "days = {days}");
        }
    }

    #[test]
    fn test_design_build_long_peak() {
        for days in [91, 180, 365] {
            assert_eq!(design_build(days, ProjectType::Peak), dec!(7200), "days = {days}");
        }
    }

    #[test]
    fn test_design_build_multipliers() {
        assert_eq!(design_build(10, ProjectType::OffSeason), dec!(3000));
        assert_eq!(design_build(10, ProjectType::Rush), dec!(12000));
        assert_eq!(design_build(10, ProjectType::Emergency), dec!(18000));
        assert_eq!(design_build(120, ProjectType::OffSeason), dec!(1440));
    }

    #[test]
    fn test_design_build_breakdown() {
        let request = EstimateRequest {
            estimated_duration_days: 45,
            project_type: ProjectType::Rush,
            ..EstimateRequest::new(EstimateKind::DesignBuild)
        };
        let priced = price(request).unwrap();

        assert_eq!(priced.breakdown.billing_basis, BillingBasis::DurationTier);
        assert_eq!(priced.breakdown.base_price, dec!(2500));
        assert_eq!(priced.breakdown.multiplier, dec!(3.2));
        assert_eq!(priced.total_estimated_cost, Some(dec!(8000)));
        assert!(priced.monthly_estimated_cost.is_none());
    }

    #[test]
    fn test_recurring_hourly() {
        let priced = price(hourly_maintenance(8, dec!(50), dec!(25), dec!(15))).unwrap();

        assert_eq!(priced.monthly_estimated_cost, Some(dec!(690)));
        assert!(priced.total_estimated_cost.is_none());
        assert_eq!(priced.breakdown.billing_basis, BillingBasis::Hourly);
        assert_eq!(priced.breakdown.hourly_rate, Some(dec!(75)));
        assert_eq!(priced.breakdown.labor_cost, dec!(600));
        assert_eq!(priced.breakdown.additional_costs, dec!(90));
    }

    #[test]
    fn test_recurring_discount_applies_last() {
        let mut request = hourly_maintenance(8, dec!(50), dec!(25), dec!(15));
        request.is_recurring = true;
        let priced = price(request).unwrap();
        assert_eq!(priced.monthly_estimated_cost, Some(dec!(621)));
        assert_eq!(priced.breakdown.recurring_discount, dec!(69));

        let mut request = hourly_maintenance(6, dec!(30), dec!(20), dec!(10));
        request.is_recurring = true;
        assert_eq!(price(request).unwrap().monthly_estimated_cost, Some(dec!(540)));
    }

    #[test]
    fn test_recurring_hourly_rates_by_service_type() {
        let cases = [
            (ServiceType::Maintenance, dec!(75)),
            (ServiceType::Repair, dec!(95)),
            (ServiceType::Installation, dec!(120)),
            (ServiceType::Consultation, dec!(150)),
        ];
        for (service_type, rate) in cases {
            let request = EstimateRequest {
                service_type,
                estimated_hours: 2,
                ..EstimateRequest::new(EstimateKind::RecurringService)
            };
            assert_eq!(price(request).unwrap().monthly_estimated_cost, Some(rate * dec!(2)));
        }
    }

    #[test]
    fn test_recurring_ignores_project_type() {
        let mut request = hourly_maintenance(8, dec!(50), dec!(25), dec!(15));
        request.project_type = ProjectType::Emergency;
        assert_eq!(price(request).unwrap().monthly_estimated_cost, Some(dec!(690)));
    }

    #[test]
    fn test_recurring_per_visit() {
        let request = EstimateRequest {
            per_visit_cost: dec!(690),
            visits_per_month: 1,
            // Ignored on the per-visit basis
            estimated_hours: 40,
            material_cost: dec!(500),
            ..EstimateRequest::new(EstimateKind::RecurringService)
        };
        let priced = price(request).unwrap();

        assert_eq!(priced.monthly_estimated_cost, Some(dec!(690)));
        assert_eq!(priced.breakdown.billing_basis, BillingBasis::PerVisit);
        assert!(priced.breakdown.hourly_rate.is_none());
    }

    #[test]
    fn test_recurring_per_visit_with_discount() {
        let request = EstimateRequest {
            per_visit_cost: dec!(120),
            visits_per_month: 4,
            is_recurring: true,
            ..EstimateRequest::new(EstimateKind::RecurringService)
        };
        assert_eq!(price(request).unwrap().monthly_estimated_cost, Some(dec!(432)));
    }

    #[test]
    fn test_recurring_falls_back_to_hourly_when_visits_missing() {
        let request = EstimateRequest {
            per_visit_cost: dec!(690),
            visits_per_month: 0,
            estimated_hours: 2,
            ..EstimateRequest::new(EstimateKind::RecurringService)
        };
        let priced = price(request).unwrap();

        assert_eq!(priced.breakdown.billing_basis, BillingBasis::Hourly);
        assert_eq!(priced.monthly_estimated_cost, Some(dec!(150)));
    }

    #[test]
    fn test_on_demand_travel_surcharge() {
        assert_eq!(on_demand(dec!(10)), dec!(150));
        assert_eq!(on_demand(dec!(15)), dec!(150));
        assert_eq!(on_demand(dec!(15.01)), dec!(175));
        assert_eq!(on_demand(dec!(20)), dec!(175));
    }

    #[test]
    fn test_on_demand_ignores_other_inputs() {
        let request = EstimateRequest {
            distance_from_base: dec!(5),
            estimated_duration_days: 200,
            project_type: ProjectType::Emergency,
            estimated_hours: 12,
            material_cost: dec!(999),
            is_recurring: true,
            ..EstimateRequest::new(EstimateKind::OnDemand)
        };
        assert_eq!(price(request).unwrap().total_estimated_cost, Some(dec!(150)));
    }

    #[test]
    fn test_invalid_kind_is_rejected() {
        let input: CreateEstimate = serde_json::from_value(serde_json::json!({
            "projectName": "Invalid Kind",
            "clientName": "Dana",
            "clientEmail": "dana@example.com",
            "estimateKind": "Invalid"
        }))
        .unwrap();

        let err = EstimateRequest::try_from(&input).unwrap_err();
        assert_eq!(err, PricingError::InvalidKind("Invalid".to_string()));
        assert_eq!(err.to_string(), "Invalid EstimateKind: Invalid");
    }

    #[test]
    fn test_lenient_type_labels() {
        let input: CreateEstimate = serde_json::from_value(serde_json::json!({
            "projectName": "Lawn",
            "clientName": "Dana",
            "clientEmail": "dana@example.com",
            "estimateKind": "DesignBuild",
            "projectType": "Seasonal",
            "serviceType": "Landscaping"
        }))
        .unwrap();

        let request = EstimateRequest::try_from(&input).unwrap();
        assert_eq!(request.project_type, ProjectType::Standard);
        assert_eq!(request.service_type, ServiceType::Maintenance);
    }

    #[test]
    fn test_negative_inputs_name_the_field() {
        let cases = [
            (
                EstimateRequest {
                    estimated_duration_days: -1,
                    ..EstimateRequest::new(EstimateKind::DesignBuild)
                },
                "estimatedDurationDays",
            ),
            (
                EstimateRequest {
                    estimated_hours: -3,
                    ..EstimateRequest::new(EstimateKind::RecurringService)
                },
                "estimatedHours",
            ),
            (
                EstimateRequest {
                    material_cost: dec!(-0.01),
                    ..EstimateRequest::new(EstimateKind::RecurringService)
                },
                "materialCost",
            ),
            (
                EstimateRequest {
                    distance_from_base: dec!(-20),
                    ..EstimateRequest::new(EstimateKind::OnDemand)
                },
                "distanceFromBase",
            ),
        ];

        for (request, expected) in cases {
            match price(request) {
                Err(PricingError::InvalidInput { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected InvalidInput for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_negative_zero_is_accepted() {
        let request = EstimateRequest {
            travel_cost: dec!(-0),
            ..EstimateRequest::new(EstimateKind::RecurringService)
        };
        assert!(price(request).is_ok());
    }

    #[test]
    fn test_pricing_is_deterministic() {
        let mut request = hourly_maintenance(7, dec!(12.34), dec!(5.55), dec!(0.01));
        request.is_recurring = true;

        let first = price(request.clone()).unwrap();
        let second = price(request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rounds_to_cents() {
        let request = EstimateRequest {
            per_visit_cost: dec!(33.335),
            visits_per_month: 1,
            ..EstimateRequest::new(EstimateKind::RecurringService)
        };
        assert_eq!(price(request).unwrap().monthly_estimated_cost, Some(dec!(33.34)));
    }

    fn expect_invalid(request: EstimateRequest, expected: &str) {
        match price(request) {
            Err(PricingError::InvalidInput { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected InvalidInput for {expected}, got {other:?}"),
        }
    }

    #[test]
    fn test_amounts_beyond_money_column_are_rejected() {
        let huge = dec!(70000000000000000000000000000);

        expect_invalid(
            EstimateRequest {
                per_visit_cost: huge,
                visits_per_month: 2,
                ..EstimateRequest::new(EstimateKind::RecurringService)
            },
            "perVisitCost",
        );
        expect_invalid(
            EstimateRequest {
                material_cost: huge,
                equipment_cost: huge,
                ..EstimateRequest::new(EstimateKind::RecurringService)
            },
            "materialCost",
        );
        expect_invalid(
            EstimateRequest {
                distance_from_base: MAX_MONEY + dec!(0.0001),
                ..EstimateRequest::new(EstimateKind::OnDemand)
            },
            "distanceFromBase",
        );
    }

    #[test]
    fn test_largest_storable_amount_is_accepted() {
        let request = EstimateRequest {
            material_cost: MAX_MONEY,
            ..EstimateRequest::new(EstimateKind::DesignBuild)
        };
        assert!(price(request).is_ok());
    }

    #[test]
    fn test_monthly_total_beyond_money_column_is_rejected() {
        expect_invalid(
            EstimateRequest {
                per_visit_cost: dec!(1000000000000),
                visits_per_month: 10_000,
                ..EstimateRequest::new(EstimateKind::RecurringService)
            },
            "monthlyEstimatedCost",
        );
        expect_invalid(
            EstimateRequest {
                material_cost: MAX_MONEY,
                equipment_cost: MAX_MONEY,
                ..EstimateRequest::new(EstimateKind::RecurringService)
            },
            "monthlyEstimatedCost",
        );
    }

    #[test]
    fn test_sub_ten_thousandth_amounts_are_rejected() {
        expect_invalid(
            EstimateRequest {
                per_visit_cost: dec!(0.00005),
                visits_per_month: 3,
                ..EstimateRequest::new(EstimateKind::RecurringService)
            },
            "perVisitCost",
        );

        let trailing_zeros = EstimateRequest {
            per_visit_cost: dec!(12.500000),
            visits_per_month: 2,
            ..EstimateRequest::new(EstimateKind::RecurringService)
        };
        assert_eq!(price(trailing_zeros).unwrap().monthly_estimated_cost, Some(dec!(25)));
    }
}
