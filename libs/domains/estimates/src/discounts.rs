//! Data-driven discount rules evaluated against a priced estimate.
//!
//! Rules are filtered by validity window and predicates, then applied in
//! `priority` order (highest first, ties by `id`). Stackable rules add to the
//! running discount; the first applicable non-stackable rule replaces it and
//! ends evaluation. The discount never exceeds the pre-discount total.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{Estimate, ProjectType};
use crate::pricing::{PricingError, check_money, round_money};

/// Amount a rule takes off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "discountType")]
pub enum DiscountValue {
    /// Percent of the pre-discount total
    Percentage {
        #[serde(rename = "discountPercentage")]
        percentage: Decimal,
    },
    /// Fixed currency amount
    FixedAmount {
        #[serde(rename = "discountAmount")]
        amount: Decimal,
    },
}

impl DiscountValue {
    fn amount_for(&self, subtotal: Decimal) -> Result<Decimal, PricingError> {
        match self {
            DiscountValue::Percentage { percentage } => subtotal
                .checked_mul(*percentage)
                .and_then(|scaled| scaled.checked_div(dec!(100)))
                .ok_or_else(|| overflow("discountPercentage")),
            DiscountValue::FixedAmount { amount } => Ok(*amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_rule"))]
pub struct DiscountRule {
    #[validate(length(min = 1, max = 100))]
    pub id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(flatten)]
    pub value: DiscountValue,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub minimum_order_value: Decimal,
    #[serde(default)]
    pub maximum_duration_days: Option<i32>,
    #[serde(default)]
    pub requires_rush_order: bool,
    #[serde(default)]
    pub requires_repeat_client: bool,
    /// Empty means every project type
    #[serde(default)]
    pub applicable_project_types: Vec<String>,
    /// Empty means every client tier
    #[serde(default)]
    pub applicable_client_tiers: Vec<String>,
    #[serde(default)]
    pub required_packages: Vec<String>,
    #[serde(default)]
    pub required_add_ons: Vec<String>,
    #[serde(default = "default_stackable")]
    pub is_stackable: bool,
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub valid_to: Option<DateTime<Utc>>,
}

fn default_stackable() -> bool {
    true
}

fn validate_rule(rule: &DiscountRule) -> Result<(), ValidationError> {
    match rule.value {
        DiscountValue::Percentage { percentage } if percentage < Decimal::ZERO || percentage > dec!(100) => {
            return Err(ValidationError::new("discount_percentage_range"));
        }
        DiscountValue::FixedAmount { amount } if amount < Decimal::ZERO => {
            return Err(ValidationError::new("discount_amount_negative"));
        }
        DiscountValue::FixedAmount { amount } if check_money("discountAmount", amount).is_err() => {
            return Err(ValidationError::new("discount_amount_out_of_range"));
        }
        _ => {}
    }

    if rule.minimum_order_value < Decimal::ZERO {
        return Err(ValidationError::new("minimum_order_value_negative"));
    }
    if check_money("minimumOrderValue", rule.minimum_order_value).is_err() {
        return Err(ValidationError::new("minimum_order_value_out_of_range"));
    }

    if let (Some(from), Some(to)) = (rule.valid_from, rule.valid_to) {
        if from > to {
            return Err(ValidationError::new("validity_window_inverted"));
        }
    }

    Ok(())
}

/// Attributes of an estimate that rules can match on
#[derive(Debug, Clone)]
pub struct DiscountContext<'a> {
    /// Pre-discount total
    pub subtotal: Decimal,
    pub duration_days: i32,
    pub project_type: ProjectType,
    pub client_tier: &'a str,
    pub is_rush_order: bool,
    pub is_repeat_client: bool,
    pub selected_packages: &'a [String],
    pub selected_add_ons: &'a [String],
    /// Instant the validity windows are checked against
    pub at: DateTime<Utc>,
}

impl<'a> DiscountContext<'a> {
    pub fn for_estimate(estimate: &'a Estimate, at: DateTime<Utc>) -> Self {
        Self {
            subtotal: estimate.priced_amount(),
            duration_days: estimate.estimated_duration_days,
            project_type: estimate.project_type,
            client_tier: &estimate.client_tier,
            is_rush_order: estimate.is_rush_order,
            is_repeat_client: estimate.is_repeat_client,
            selected_packages: &estimate.selected_packages,
            selected_add_ons: &estimate.selected_add_ons,
            at,
        }
    }
}

impl DiscountRule {
    /// Inclusive on both ends; an open end never excludes.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.valid_from.is_none_or(|from| from <= at) && self.valid_to.is_none_or(|to| at <= to)
    }

    pub fn applies_to(&self, ctx: &DiscountContext<'_>) -> bool {
        if ctx.subtotal < self.minimum_order_value {
            return false;
        }
        if let Some(max_days) = self.maximum_duration_days {
            if ctx.duration_days > max_days {
                return false;
            }
        }
        if self.requires_rush_order && !ctx.is_rush_order {
            return false;
        }
        if self.requires_repeat_client && !ctx.is_repeat_client {
            return false;
        }

        let project_type = ctx.project_type.to_string();
        if !self.applicable_project_types.is_empty()
            && !self.applicable_project_types.contains(&project_type)
        {
            return false;
        }
        if !self.applicable_client_tiers.is_empty()
            && !self.applicable_client_tiers.iter().any(|tier| tier == ctx.client_tier)
        {
            return false;
        }

        self.required_packages
            .iter()
            .all(|p| ctx.selected_packages.contains(p))
            && self
                .required_add_ons
                .iter()
                .all(|a| ctx.selected_add_ons.contains(a))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscount {
    pub rule_id: String,
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscountOutcome {
    pub subtotal: Decimal,
    /// In application order
    pub applied: Vec<AppliedDiscount>,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
}

/// Request body for previewing a rule set against a stored estimate
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscountPreview {
    #[validate(length(max = 100), nested)]
    pub rules: Vec<DiscountRule>,
    /// Defaults to now
    #[serde(default)]
    pub evaluated_at: Option<DateTime<Utc>>,
}

fn overflow(field: &'static str) -> PricingError {
    PricingError::InvalidInput {
        field,
        reason: "overflows the discount total".to_string(),
    }
}

/// Apply `rules` to `ctx`.
pub fn evaluate(
    rules: &[DiscountRule],
    ctx: &DiscountContext<'_>,
) -> Result<DiscountOutcome, PricingError> {
    let mut candidates: Vec<&DiscountRule> = rules
        .iter()
        .filter(|rule| rule.is_active_at(ctx.at) && rule.applies_to(ctx))
        .collect();
    candidates.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));

    let mut applied = Vec::new();
    for rule in candidates {
        let entry = AppliedDiscount {
            rule_id: rule.id.clone(),
            name: rule.name.clone(),
            amount: round_money(rule.value.amount_for(ctx.subtotal)?),
        };

        if rule.is_stackable {
            applied.push(entry);
        } else {
            applied.clear();
            applied.push(entry);
            break;
        }
    }

    let raw = applied
        .iter()
        .try_fold(Decimal::ZERO, |sum, d| sum.checked_add(d.amount))
        .ok_or_else(|| overflow("discountAmount"))?;
    let discount_amount = raw.min(ctx.subtotal).max(Decimal::ZERO);

    tracing::debug!(
        rules = rules.len(),
        applied = applied.len(),
        subtotal = %ctx.subtotal,
        discount = %discount_amount,
        "Evaluated discount rules"
    );

    Ok(DiscountOutcome {
        subtotal: ctx.subtotal,
        applied,
        discount_amount,
        final_price: ctx.subtotal - discount_amount,
    })
}
