//! Entitlements and feature gating.
//!
//! [`FeatureAccess`] answers "may this organization do X?" for the current
//! plan and usage. It is a cheap, borrowed view; build one from
//! [`SubscriptionState::access`](super::SubscriptionState::access) whenever a
//! decision is needed.
//!
//! Every check fails closed. With no resolved plan, an unknown key, or a key
//! that names a numeric limit instead of a flag, the answer is "denied" and the
//! limits read as zero.

use super::capability::{
    AnalyticsCapability, Capability, IntegrationCapability, LeadCapability, PipelineCapability,
};
use super::error::SubscriptionError;
use super::plans::{Limit, SubscriptionPlan};
use super::subscription::UsageCounters;

/// Outcome of a feature check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureCheckResult {
    /// The plan includes the capability.
    Allowed,
    /// There is no resolved plan.
    UnknownPlan,
    /// The key does not name a boolean capability.
    UnknownCapability,
    /// The plan does not include the capability.
    NotIncluded,
}

impl FeatureCheckResult {
    /// Check if access is granted.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Feature access evaluator over a plan and usage counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureAccess<'a> {
    plan: Option<&'a SubscriptionPlan>,
    usage: UsageCounters,
}

impl<'a> FeatureAccess<'a> {
    #[must_use]
    pub fn new(plan: Option<&'a SubscriptionPlan>, usage: UsageCounters) -> Self {
        Self { plan, usage }
    }

    /// Evaluate a plan with no usage recorded.
    #[must_use]
    pub fn for_plan(plan: &'a SubscriptionPlan) -> Self {
        Self::new(Some(plan), UsageCounters::default())
    }

    /// The plan id, if a plan is resolved.
    #[must_use]
    pub fn plan_id(&self) -> Option<&'a str> {
        self.plan.map(|p| p.id)
    }

    #[must_use]
    pub fn plan(&self) -> Option<&'a SubscriptionPlan> {
        self.plan
    }

    #[must_use]
    pub fn usage(&self) -> UsageCounters {
        self.usage
    }

    /// Check a typed capability.
    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        self.plan
            .is_some_and(|p| capability.enabled_in(&p.features))
    }

    /// Check a capability key and report why access was denied.
    pub fn check_feature(&self, key: &str) -> FeatureCheckResult {
        self.check(Capability::parse(key))
    }

    fn check(&self, capability: Option<Capability>) -> FeatureCheckResult {
        let Some(plan) = self.plan else {
            return FeatureCheckResult::UnknownPlan;
        };
        let Some(capability) = capability else {
            return FeatureCheckResult::UnknownCapability;
        };

        if capability.enabled_in(&plan.features) {
            FeatureCheckResult::Allowed
        } else {
            FeatureCheckResult::NotIncluded
        }
    }

    /// Check a top-level flag (`apiAccess`), a dotted path
    /// (`analytics.advanced`), or a leaf name that only one group has
    /// (`advanced`). `canDelete` exists in two groups and needs its dotted path.
    #[must_use]
    pub fn can_access_feature(&self, key: &str) -> bool {
        self.check_feature(key).is_allowed()
    }

    /// Check a pipeline stage capability (`canAdd`, `canEdit`, `canDelete`).
    #[must_use]
    pub fn can_access_pipeline_feature(&self, key: &str) -> bool {
        self.check_pipeline_feature(key).is_allowed()
    }

    /// Check a lead management capability (`canImport`, `canExport`,
    /// `canBulkEdit`, `canDelete`).
    #[must_use]
    pub fn can_access_lead_feature(&self, key: &str) -> bool {
        self.check_lead_feature(key).is_allowed()
    }

    /// Check an analytics capability (`basic`, `advanced`, `customReports`).
    #[must_use]
    pub fn can_access_analytics_feature(&self, key: &str) -> bool {
        self.check_analytics_feature(key).is_allowed()
    }

    /// Check an integration (`crm`, `email`, `calendar`, `custom`).
    #[must_use]
    pub fn can_access_integration_feature(&self, key: &str) -> bool {
        self.check_integration_feature(key).is_allowed()
    }

    pub fn check_pipeline_feature(&self, key: &str) -> FeatureCheckResult {
        self.check(PipelineCapability::parse(key).map(Capability::Pipeline))
    }

    pub fn check_lead_feature(&self, key: &str) -> FeatureCheckResult {
        self.check(LeadCapability::parse(key).map(Capability::Lead))
    }

    pub fn check_analytics_feature(&self, key: &str) -> FeatureCheckResult {
        self.check(AnalyticsCapability::parse(key).map(Capability::Analytics))
    }

    pub fn check_integration_feature(&self, key: &str) -> FeatureCheckResult {
        self.check(IntegrationCapability::parse(key).map(Capability::Integration))
    }

    /// Require a capability.
    ///
    /// # Errors
    ///
    /// Returns `SubscriptionError::FeatureNotIncluded` when the plan lacks the
    /// capability, or when there is no resolved plan.
    pub fn require(&self, capability: Capability) -> Result<(), SubscriptionError> {
        if self.has(capability) {
            return Ok(());
        }

        Err(SubscriptionError::FeatureNotIncluded {
            feature: capability.to_string(),
            plan_id: self.plan_id().unwrap_or("unknown").to_string(),
        })
    }

    /// Maximum leads for the plan.
    #[must_use]
    pub fn max_leads(&self) -> Limit {
        self.limit(|p| p.features.max_leads)
    }

    /// Maximum team members for the plan.
    #[must_use]
    pub fn max_team_members(&self) -> Limit {
        self.limit(|p| p.features.max_team_members)
    }

    /// Maximum pipeline stages for the plan.
    #[must_use]
    pub fn max_pipeline_stages(&self) -> Limit {
        self.limit(|p| p.features.pipeline_stages.max_stages)
    }

    /// Leads that can still be added. Unlimited plans stay unlimited, and a
    /// finite plan at or over its cap reports zero.
    #[must_use]
    pub fn remaining_leads(&self) -> Limit {
        self.max_leads().remaining(self.usage.total_leads)
    }

    /// Team member slots still available.
    #[must_use]
    pub fn remaining_team_members(&self) -> Limit {
        self.max_team_members().remaining(self.usage.total_team_members)
    }

    /// Pipeline stages that can still be created.
    #[must_use]
    pub fn remaining_pipeline_stages(&self) -> Limit {
        self.max_pipeline_stages()
            .remaining(self.usage.total_pipeline_stages)
    }

    #[must_use]
    pub fn can_add_lead(&self) -> bool {
        self.remaining_leads().has_capacity()
    }

    #[must_use]
    pub fn can_add_team_member(&self) -> bool {
        self.remaining_team_members().has_capacity()
    }

    /// Both the permission to add stages and room under the cap.
    #[must_use]
    pub fn can_add_pipeline_stage(&self) -> bool {
        self.has(Capability::Pipeline(PipelineCapability::CanAdd))
            && self.remaining_pipeline_stages().has_capacity()
    }

    fn limit(&self, read: impl FnOnce(&SubscriptionPlan) -> Limit) -> Limit {
        self.plan.map(read).unwrap_or(Limit::Finite(0))
    }
}
