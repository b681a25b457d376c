//! Subscription state and management.
//!
//! [`SubscriptionState`] is the per-organization, per-session record of the
//! current plan, billing cycle and usage counters. It is plain data with two
//! validated mutators; it never performs I/O.
//!
//! [`SubscriptionManager`] sits on top of it for the plan-change and
//! billing-change user actions: it validates, persists through a
//! [`SubscriptionStore`], and reports to an audit logger.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::audit::{NoOpAuditLogger, SubscriptionAuditEvent, SubscriptionAuditLogger};
use super::entitlements::FeatureAccess;
use super::error::SubscriptionError;
use super::plans::{Plans, SubscriptionPlan, get_plan};
use super::storage::{StoredSubscription, SubscriptionStore};
use super::usage::{DEFAULT_UPGRADE_THRESHOLD, normalize_threshold};
use super::validation::validate_organization_id;
use crate::config::SubscriptionConfig;
use crate::error::Result;

/// Billing cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingType {
    /// Billed every month.
    #[default]
    Monthly,
    /// Billed once a year.
    Annual,
}

impl BillingType {
    /// Parse a billing type. Only `monthly` and `annual` are accepted.
    pub fn parse(value: &str) -> std::result::Result<Self, SubscriptionError> {
        match value {
            "monthly" => Ok(Self::Monthly),
            "annual" => Ok(Self::Annual),
            other => Err(SubscriptionError::InvalidBillingType {
                value: other.to_string(),
            }),
        }
    }

    /// Convert to string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        }
    }
}

impl FromStr for BillingType {
    type Err = SubscriptionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BillingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Usage counts supplied by the data owners (lead list, team roster,
/// pipeline editor).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageCounters {
    pub total_leads: u32,
    pub total_team_members: u32,
    pub total_pipeline_stages: u32,
}

impl UsageCounters {
    #[must_use]
    pub fn new(total_leads: u32, total_team_members: u32, total_pipeline_stages: u32) -> Self {
        Self {
            total_leads,
            total_team_members,
            total_pipeline_stages,
        }
    }
}

/// An organization's subscription for the lifetime of a session.
///
/// The plan is a reference into the static catalog. A state restored from
/// storage with a plan id the catalog no longer knows keeps that id but has
/// no plan; every access check on it is denied.
///
/// The upgrade threshold travels with the state so usage meters built from it
/// follow the configuration the state was loaded under.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionState {
    plan_id: String,
    plan: Option<&'static SubscriptionPlan>,
    billing_type: BillingType,
    usage: UsageCounters,
    upgrade_threshold: f64,
}

impl SubscriptionState {
    /// Start on the lowest tier, billed monthly.
    #[must_use]
    pub fn new() -> Self {
        Self::with_plan(Plans::catalog().lowest_tier(), BillingType::Monthly)
    }

    /// Start on a specific plan.
    #[must_use]
    pub fn with_plan(plan: &'static SubscriptionPlan, billing_type: BillingType) -> Self {
        Self {
            plan_id: plan.id.to_string(),
            plan: Some(plan),
            billing_type,
            usage: UsageCounters::default(),
            upgrade_threshold: DEFAULT_UPGRADE_THRESHOLD,
        }
    }

    /// Rebuild state from persisted values without validating the plan id.
    #[must_use]
    pub fn restore(plan_id: &str, billing_type: BillingType) -> Self {
        let plan = get_plan(plan_id);
        if plan.is_none() {
            tracing::warn!(
                target: "leadgate::subscription",
                plan_id = %plan_id,
                "Restored subscription references an unknown plan, denying all features"
            );
        }

        Self {
            plan_id: plan_id.to_string(),
            plan,
            billing_type,
            usage: UsageCounters::default(),
            upgrade_threshold: DEFAULT_UPGRADE_THRESHOLD,
        }
    }

    /// The plan id as last set or restored.
    #[must_use]
    pub fn plan_id(&self) -> &str {
        &self.plan_id
    }

    /// The current plan, or `None` if the restored id was unknown.
    #[must_use]
    pub fn current_plan(&self) -> Option<&'static SubscriptionPlan> {
        self.plan
    }

    #[must_use]
    pub fn billing_type(&self) -> BillingType {
        self.billing_type
    }

    #[must_use]
    pub fn usage(&self) -> UsageCounters {
        self.usage
    }

    /// Fraction of a finite limit at which usage meters prompt an upgrade.
    #[must_use]
    pub fn upgrade_threshold(&self) -> f64 {
        self.upgrade_threshold
    }

    /// Set the upgrade threshold. Values outside `(0, 1]` are clamped and NaN
    /// falls back to the default.
    pub fn set_upgrade_threshold(&mut self, threshold: f64) {
        self.upgrade_threshold = normalize_threshold(threshold);
    }

    /// Switch plans.
    ///
    /// # Errors
    ///
    /// Returns `SubscriptionError::UnknownPlan` if the id is not in the
    /// catalog. The current plan is left unchanged.
    pub fn set_plan(&mut self, plan_id: &str) -> std::result::Result<&'static SubscriptionPlan, SubscriptionError> {
        let plan = Plans::catalog().require(plan_id)?;
        self.plan_id = plan.id.to_string();
        self.plan = Some(plan);
        Ok(plan)
    }

    /// Switch billing cycle.
    ///
    /// # Errors
    ///
    /// Returns `SubscriptionError::InvalidBillingType` for anything other than
    /// `monthly` or `annual`. The billing type is left unchanged.
    pub fn set_billing_type(&mut self, value: &str) -> std::result::Result<BillingType, SubscriptionError> {
        let billing_type = BillingType::parse(value)?;
        self.billing_type = billing_type;
        Ok(billing_type)
    }

    /// Replace all usage counters.
    pub fn set_usage(&mut self, usage: UsageCounters) {
        self.usage = usage;
    }

    pub fn set_total_leads(&mut self, total: u32) {
        self.usage.total_leads = total;
    }

    pub fn set_total_team_members(&mut self, total: u32) {
        self.usage.total_team_members = total;
    }

    pub fn set_total_pipeline_stages(&mut self, total: u32) {
        self.usage.total_pipeline_stages = total;
    }

    /// Price of the current billing period, in cents.
    #[must_use]
    pub fn current_price_cents(&self) -> Option<u32> {
        self.plan.map(|p| p.price_cents(self.billing_type))
    }

    /// The feature access evaluator for this state.
    #[must_use]
    pub fn access(&self) -> FeatureAccess<'static> {
        FeatureAccess::new(self.plan, self.usage)
    }

    /// The record to persist for this state.
    #[must_use]
    pub fn to_stored(&self) -> StoredSubscription {
        StoredSubscription::new(self.plan_id.clone(), self.billing_type)
    }
}

impl Default for SubscriptionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscription management operations.
///
/// Loads an organization's subscription at session start and applies plan and
/// billing changes, persisting each one before it becomes visible.
pub struct SubscriptionManager<S: SubscriptionStore, A: SubscriptionAuditLogger = NoOpAuditLogger> {
    store: S,
    audit: A,
    default_plan: &'static SubscriptionPlan,
    default_billing: BillingType,
    upgrade_threshold: f64,
}

impl<S: SubscriptionStore> SubscriptionManager<S> {
    /// Create a new subscription manager without audit logging.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_audit_logger(store, NoOpAuditLogger)
    }
}

impl<S: SubscriptionStore, A: SubscriptionAuditLogger> SubscriptionManager<S, A> {
    /// Create a new subscription manager that reports changes to `audit`.
    #[must_use]
    pub fn with_audit_logger(store: S, audit: A) -> Self {
        Self {
            store,
            audit,
            default_plan: Plans::catalog().lowest_tier(),
            default_billing: BillingType::Monthly,
            upgrade_threshold: DEFAULT_UPGRADE_THRESHOLD,
        }
    }

    /// Apply the defaults for organizations with nothing stored, and the
    /// upgrade threshold for every loaded state.
    ///
    /// An unknown default plan falls back to the lowest tier.
    #[must_use]
    pub fn with_config(mut self, config: &SubscriptionConfig) -> Self {
        self.default_plan = match get_plan(&config.default_plan) {
            Some(plan) => plan,
            None => {
                tracing::warn!(
                    target: "leadgate::subscription",
                    plan_id = %config.default_plan,
                    "Configured default plan not in catalog, using lowest tier"
                );
                Plans::catalog().lowest_tier()
            }
        };
        self.default_billing = config.default_billing;
        self.upgrade_threshold = normalize_threshold(config.upgrade_threshold);
        self
    }

    /// The state a new organization starts with.
    #[must_use]
    pub fn default_state(&self) -> SubscriptionState {
        let mut state = SubscriptionState::with_plan(self.default_plan, self.default_billing);
        state.set_upgrade_threshold(self.upgrade_threshold);
        state
    }

    /// Load an organization's subscription for a new session.
    ///
    /// Nothing stored yields the default state. A stored plan id that is no
    /// longer in the catalog is kept, and the resulting state denies access.
    pub async fn load_state(&self, organization_id: &str, usage: UsageCounters) -> Result<SubscriptionState> {
        validate_organization_id(organization_id)?;

        let stored = self.store.load(organization_id).await.inspect_err(|err| {
            tracing::error!(
                target: "leadgate::storage",
                organization_id = %organization_id,
                error = %err,
                "Failed to load subscription"
            );
        })?;

        let mut state = match stored {
            Some(stored) => {
                let state = SubscriptionState::restore(&stored.plan_id, stored.billing_type);
                if state.current_plan().is_none() {
                    self.audit
                        .log(SubscriptionAuditEvent::UnknownPlanRestored {
                            organization_id: organization_id.to_string(),
                            plan_id: stored.plan_id,
                        })
                        .await;
                }
                state
            }
            None => {
                tracing::debug!(
                    target: "leadgate::subscription",
                    organization_id = %organization_id,
                    plan_id = %self.default_plan.id,
                    "No stored subscription, using default"
                );
                self.default_state()
            }
        };

        state.set_usage(usage);
        state.set_upgrade_threshold(self.upgrade_threshold);
        Ok(state)
    }

    /// Change the organization's plan.
    ///
    /// The new plan is persisted before `state` is updated; on any error
    /// `state` is left as it was.
    pub async fn change_plan(
        &self,
        organization_id: &str,
        state: &mut SubscriptionState,
        plan_id: &str,
    ) -> Result<()> {
        validate_organization_id(organization_id)?;

        let mut next = state.clone();
        if let Err(err) = next.set_plan(plan_id) {
            self.reject(organization_id, &err).await;
            return Err(err.into());
        }

        self.persist(organization_id, &next).await?;

        tracing::info!(
            target: "leadgate::subscription",
            organization_id = %organization_id,
            from = %state.plan_id(),
            to = %next.plan_id(),
            "Plan changed"
        );
        self.audit
            .log(SubscriptionAuditEvent::PlanChanged {
                organization_id: organization_id.to_string(),
                from_plan: state.plan_id().to_string(),
                to_plan: next.plan_id().to_string(),
            })
            .await;

        *state = next;
        Ok(())
    }

    /// Change the organization's billing cycle.
    ///
    /// Same persistence rules as [`change_plan`](Self::change_plan).
    pub async fn change_billing_type(
        &self,
        organization_id: &str,
        state: &mut SubscriptionState,
        value: &str,
    ) -> Result<()> {
        validate_organization_id(organization_id)?;

        let mut next = state.clone();
        if let Err(err) = next.set_billing_type(value) {
            self.reject(organization_id, &err).await;
            return Err(err.into());
        }

        self.persist(organization_id, &next).await?;

        tracing::info!(
            target: "leadgate::subscription",
            organization_id = %organization_id,
            from = %state.billing_type(),
            to = %next.billing_type(),
            "Billing type changed"
        );
        self.audit
            .log(SubscriptionAuditEvent::BillingTypeChanged {
                organization_id: organization_id.to_string(),
                from: state.billing_type().to_string(),
                to: next.billing_type().to_string(),
            })
            .await;

        *state = next;
        Ok(())
    }

    async fn persist(&self, organization_id: &str, state: &SubscriptionState) -> Result<()> {
        self.store
            .save(organization_id, &state.to_stored())
            .await
            .inspect_err(|err| {
                tracing::error!(
                    target: "leadgate::storage",
                    organization_id = %organization_id,
                    error = %err,
                    "Failed to save subscription"
                );
            })?;

        tracing::debug!(
            target: "leadgate::storage",
            organization_id = %organization_id,
            plan_id = %state.plan_id(),
            billing_type = %state.billing_type(),
            "Subscription saved"
        );
        Ok(())
    }

    async fn reject(&self, organization_id: &str, err: &SubscriptionError) {
        tracing::debug!(
            target: "leadgate::subscription",
            organization_id = %organization_id,
            error = %err,
            "Subscription change rejected"
        );
        self.audit
            .log(SubscriptionAuditEvent::ChangeRejected {
                organization_id: organization_id.to_string(),
                reason: err.to_string(),
            })
            .await;
    }
}
