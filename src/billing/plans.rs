//! Plan catalog.
//!
//! The catalog is a fixed, price-ordered table of four tiers (free, starter,
//! growth, pro) compiled into the binary. There is no runtime registration:
//! every lookup resolves against the same static table.
//!
//! # Limits
//!
//! Numeric limits use [`Limit`] rather than a bare integer. On the wire a
//! limit is an integer where `-1` means unlimited, so the JSON produced here
//! matches what the front-end expects:
//!
//! ```rust,ignore
//! use leadgate::billing::{Plans, Limit};
//!
//! let pro = Plans::catalog().get("pro").unwrap();
//! assert_eq!(pro.features.max_leads, Limit::Unlimited);
//!
//! let json = Plans::catalog().to_json()?;
//! assert_eq!(json[3]["features"]["maxLeads"], -1);
//! ```
//!
//! # Adding a tier
//!
//! Limits must be non-decreasing as price increases. `test_catalog_is_monotonic`
//! checks this for every limit field.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::SubscriptionError;
use super::subscription::BillingType;
use crate::error::Result;

/// Wire value for an unlimited limit.
pub const UNLIMITED: i64 = -1;

/// A numeric capability limit.
///
/// `Unlimited` orders above every finite value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Limit {
    /// At most this many.
    Finite(u32),
    /// No limit.
    Unlimited,
}

impl Limit {
    /// Check if this limit is unlimited.
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// The finite value, if any.
    #[must_use]
    pub const fn finite(&self) -> Option<u32> {
        match self {
            Self::Finite(n) => Some(*n),
            Self::Unlimited => None,
        }
    }

    /// Capacity left after `used`. Never negative.
    #[must_use]
    pub const fn remaining(&self, used: u32) -> Limit {
        match self {
            Self::Finite(max) => Self::Finite(max.saturating_sub(used)),
            Self::Unlimited => Self::Unlimited,
        }
    }

    /// Check if at least one more unit fits.
    #[must_use]
    pub const fn has_capacity(&self) -> bool {
        match self {
            Self::Finite(n) => *n > 0,
            Self::Unlimited => true,
        }
    }
}

impl From<i64> for Limit {
    fn from(value: i64) -> Self {
        match value {
            UNLIMITED => Self::Unlimited,
            // Negative values other than the sentinel are corrupt; deny.
            n if n < 0 => Self::Finite(0),
            n => Self::Finite(u32::try_from(n).unwrap_or(u32::MAX)),
        }
    }
}

impl From<Limit> for i64 {
    fn from(limit: Limit) -> Self {
        match limit {
            Limit::Finite(n) => i64::from(n),
            Limit::Unlimited => UNLIMITED,
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{}", n),
            Self::Unlimited => write!(f, "unlimited"),
        }
    }
}

/// Pipeline stage capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStageFeatures {
    pub can_add: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub max_stages: Limit,
}

/// Lead list capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadManagementFeatures {
    pub can_import: bool,
    pub can_export: bool,
    pub can_bulk_edit: bool,
    pub can_delete: bool,
}

/// Reporting capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsFeatures {
    pub basic: bool,
    pub advanced: bool,
    pub custom_reports: bool,
}

/// Third-party integration capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationFeatures {
    pub crm: bool,
    pub email: bool,
    pub calendar: bool,
    pub custom: bool,
}

/// Everything a plan allows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFeatures {
    pub max_leads: Limit,
    pub max_team_members: Limit,
    pub pipeline_stages: PipelineStageFeatures,
    pub lead_management: LeadManagementFeatures,
    pub analytics: AnalyticsFeatures,
    pub integrations: IntegrationFeatures,
    pub api_access: bool,
    pub priority_support: bool,
}

/// A subscription tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    /// Plan identifier (e.g., "starter", "pro").
    pub id: &'static str,
    /// Display name for the plan.
    pub name: &'static str,
    /// Price per month when billed monthly, in cents.
    pub monthly_price_cents: u32,
    /// Price per year when billed annually, in cents.
    pub annual_price_cents: u32,
    /// Capabilities and limits.
    pub features: PlanFeatures,
}

impl SubscriptionPlan {
    /// Price for one billing period of the given type, in cents.
    #[must_use]
    pub const fn price_cents(&self, billing: BillingType) -> u32 {
        match billing {
            BillingType::Monthly => self.monthly_price_cents,
            BillingType::Annual => self.annual_price_cents,
        }
    }

    /// What paying annually saves over twelve monthly payments, in cents.
    #[must_use]
    pub const fn annual_savings_cents(&self) -> u32 {
        self.monthly_price_cents
            .saturating_mul(12)
            .saturating_sub(self.annual_price_cents)
    }

    /// Check if this is a no-cost tier.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.monthly_price_cents == 0 && self.annual_price_cents == 0
    }

    /// Get the price formatted for display (e.g., "$29.00").
    #[must_use]
    pub fn formatted_price(&self, billing: BillingType) -> String {
        let dollars = f64::from(self.price_cents(billing)) / 100.0;
        format!("${:.2}", dollars)
    }
}

const FREE: SubscriptionPlan = SubscriptionPlan {
    id: "free",
    name: "Free",
    monthly_price_cents: 0,
    annual_price_cents: 0,
    features: PlanFeatures {
        max_leads: Limit::Finite(100),
        max_team_members: Limit::Finite(1),
        pipeline_stages: PipelineStageFeatures {
            can_add: false,
            can_edit: false,
            can_delete: false,
            max_stages: Limit::Finite(5),
        },
        lead_management: LeadManagementFeatures {
            can_import: false,
            can_export: false,
            can_bulk_edit: false,
            can_delete: false,
        },
        analytics: AnalyticsFeatures {
            basic: true,
            advanced: false,
            custom_reports: false,
        },
        integrations: IntegrationFeatures {
            crm: false,
            email: false,
            calendar: false,
            custom: false,
        },
        api_access: false,
        priority_support: false,
    },
};

const STARTER: SubscriptionPlan = SubscriptionPlan {
    id: "starter",
    name: "Starter",
    monthly_price_cents: 2_900,
    annual_price_cents: 29_000,
    features: PlanFeatures {
        max_leads: Limit::Finite(1_000),
        max_team_members: Limit::Finite(3),
        pipeline_stages: PipelineStageFeatures {
            can_add: true,
            can_edit: true,
            can_delete: false,
            max_stages: Limit::Finite(10),
        },
        lead_management: LeadManagementFeatures {
            can_import: true,
            can_export: true,
            can_bulk_edit: false,
            can_delete: true,
        },
        analytics: AnalyticsFeatures {
            basic: true,
            advanced: false,
            custom_reports: false,
        },
        integrations: IntegrationFeatures {
            crm: true,
            email: true,
            calendar: false,
            custom: false,
        },
        api_access: false,
        priority_support: false,
    },
};

const GROWTH: SubscriptionPlan = SubscriptionPlan {
    id: "growth",
    name: "Growth",
    monthly_price_cents: 7_900,
    annual_price_cents: 79_000,
    features: PlanFeatures {
        max_leads: Limit::Finite(10_000),
        max_team_members: Limit::Finite(10),
        pipeline_stages: PipelineStageFeatures {
            can_add: true,
            can_edit: true,
            can_delete: true,
            max_stages: Limit::Finite(25),
        },
        lead_management: LeadManagementFeatures {
            can_import: true,
            can_export: true,
            can_bulk_edit: true,
            can_delete: true,
        },
        analytics: AnalyticsFeatures {
            basic: true,
            advanced: true,
            custom_reports: false,
        },
        integrations: IntegrationFeatures {
            crm: true,
            email: true,
            calendar: true,
            custom: false,
        },
        api_access: true,
        priority_support: false,
    },
};

const PRO: SubscriptionPlan = SubscriptionPlan {
    id: "pro",
    name: "Pro",
    monthly_price_cents: 19_900,
    annual_price_cents: 199_000,
    features: PlanFeatures {
        max_leads: Limit::Unlimited,
        max_team_members: Limit::Unlimited,
        pipeline_stages: PipelineStageFeatures {
            can_add: true,
            can_edit: true,
            can_delete: true,
            max_stages: Limit::Unlimited,
        },
        lead_management: LeadManagementFeatures {
            can_import: true,
            can_export: true,
            can_bulk_edit: true,
            can_delete: true,
        },
        analytics: AnalyticsFeatures {
            basic: true,
            advanced: true,
            custom_reports: true,
        },
        integrations: IntegrationFeatures {
            crm: true,
            email: true,
            calendar: true,
            custom: true,
        },
        api_access: true,
        priority_support: true,
    },
};

/// Ordered by price, lowest first.
static CATALOG: [SubscriptionPlan; 4] = [FREE, STARTER, GROWTH, PRO];

/// Read-only view over the plan catalog.
#[derive(Clone, Copy, Debug)]
pub struct Plans {
    plans: &'static [SubscriptionPlan],
}

impl Plans {
    /// The process-wide catalog.
    #[must_use]
    pub fn catalog() -> Self {
        Self { plans: &CATALOG }
    }

    /// Get a plan by ID.
    #[must_use]
    pub fn get(&self, plan_id: &str) -> Option<&'static SubscriptionPlan> {
        self.plans.iter().find(|p| p.id == plan_id)
    }

    /// Get a plan by ID, failing with `UnknownPlan` on a miss.
    pub fn require(&self, plan_id: &str) -> std::result::Result<&'static SubscriptionPlan, SubscriptionError> {
        self.get(plan_id).ok_or_else(|| SubscriptionError::UnknownPlan {
            plan_id: plan_id.to_string(),
        })
    }

    /// Check if a plan exists.
    #[must_use]
    pub fn contains(&self, plan_id: &str) -> bool {
        self.get(plan_id).is_some()
    }

    /// The cheapest tier. New organizations start here.
    #[must_use]
    pub fn lowest_tier(&self) -> &'static SubscriptionPlan {
        &self.plans[0]
    }

    /// Get all plan IDs, in price order.
    #[must_use]
    pub fn plan_ids(&self) -> Vec<&'static str> {
        self.plans.iter().map(|p| p.id).collect()
    }

    /// Get the number of plans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Check if there are no plans.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Iterate over all plans, in price order.
    pub fn iter(&self) -> impl Iterator<Item = &'static SubscriptionPlan> {
        self.plans.iter()
    }

    /// Serialize the catalog for presentation (pricing pages, upgrade dialogs).
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.plans)?)
    }
}

/// Look up a plan in the catalog.
#[must_use]
pub fn get_plan(plan_id: &str) -> Option<&'static SubscriptionPlan> {
    Plans::catalog().get(plan_id)
}
