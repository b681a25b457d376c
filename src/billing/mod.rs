//! Subscription plans and feature gating.
//!
//! Provides the plan catalog, per-organization subscription state, a
//! fail-closed feature access evaluator, and the decisions behind gated UI
//! and usage meters.
//!
//! # Example
//!
//! ```rust,ignore
//! use leadgate::billing::{Gate, GateView, SubscriptionManager, UsageCounters, UsageSummary};
//!
//! // Load the organization's subscription at session start
//! let manager = SubscriptionManager::new(store);
//! let mut state = manager
//!     .load_state(&org.id, UsageCounters::new(leads, members, stages))
//!     .await?;
//!
//! // Check entitlements
//! let access = state.access();
//! if !access.can_access_lead_feature("canExport") {
//!     return Err(ApiError::UpgradeRequired);
//! }
//!
//! // Gate a piece of UI
//! let view = Gate::new()
//!     .analytics("advanced")
//!     .render(&access, || advanced_charts(), None);
//!
//! // Switch plans; persisted before it takes effect
//! manager.change_plan(&org.id, &mut state, "growth").await?;
//!
//! // Usage meters
//! let summary = UsageSummary::from_state(&state);
//! ```

pub mod audit;
pub mod capability;
pub mod entitlements;
pub mod error;
pub mod gate;
pub mod plans;
pub mod storage;
pub mod subscription;
pub mod usage;
pub mod validation;

// Plan exports
pub use plans::{
    AnalyticsFeatures, IntegrationFeatures, LeadManagementFeatures, Limit,
    PipelineStageFeatures, PlanFeatures, Plans, SubscriptionPlan, UNLIMITED, get_plan,
};

// Capability exports
pub use capability::{
    AnalyticsCapability, Capability, IntegrationCapability, LeadCapability, PipelineCapability,
};

// Subscription exports
pub use subscription::{BillingType, SubscriptionManager, SubscriptionState, UsageCounters};

// Storage exports
pub use storage::{StoredSubscription, SubscriptionStore};

// Entitlements exports
pub use entitlements::{FeatureAccess, FeatureCheckResult};

// Gate exports
pub use gate::{Denial, Gate, GateDecision, GateSelector, GateView};

// Usage exports
pub use usage::{DEFAULT_UPGRADE_THRESHOLD, UsageMeter, UsageSummary};

// Audit exports
pub use audit::{
    NoOpAuditLogger, SubscriptionAuditEvent, SubscriptionAuditLogger, TracingAuditLogger,
};

// Error exports
pub use error::SubscriptionError;

// Validation exports
pub use validation::validate_organization_id;

// Test exports
#[cfg(any(test, feature = "test-helpers"))]
pub use storage::test::InMemorySubscriptionStore;
