//! Subscription-specific error types.
//!
//! These are the errors surfaced by the two state mutators (plan change and
//! billing-cycle change) and by strict capability parsing. Access checks never
//! return them; the evaluator degrades to a denial instead.

use std::fmt;

/// Subscription errors.
///
/// Convertible into [`LeadgateError`](crate::LeadgateError) with `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The plan id does not exist in the catalog.
    UnknownPlan { plan_id: String },
    /// The billing type is neither `monthly` nor `annual`.
    InvalidBillingType { value: String },
    /// The capability key does not name any feature in the plan model.
    UnknownCapability { key: String },
    /// The capability exists but the current plan does not include it.
    FeatureNotIncluded { feature: String, plan_id: String },
    /// The organization id is malformed.
    InvalidOrganizationId { id: String, reason: String },
}

impl fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPlan { plan_id } => {
                write!(f, "Unknown plan: {}", plan_id)
            }
            Self::InvalidBillingType { value } => {
                write!(f, "Invalid billing type '{}': expected 'monthly' or 'annual'", value)
            }
            Self::UnknownCapability { key } => {
                write!(f, "Unknown capability: {}", key)
            }
            Self::FeatureNotIncluded { feature, plan_id } => {
                write!(f, "Feature '{}' is not included in plan '{}'", feature, plan_id)
            }
            Self::InvalidOrganizationId { id, reason } => {
                write!(f, "Invalid organization ID '{}': {}", id, reason)
            }
        }
    }
}

impl std::error::Error for SubscriptionError {}

impl SubscriptionError {
    /// Whether the error asks the user to upgrade rather than fix their input.
    #[must_use]
    pub fn is_upgrade_required(&self) -> bool {
        matches!(self, Self::FeatureNotIncluded { .. })
    }
}
