//! Usage display.
//!
//! A [`UsageMeter`] turns a usage count and its plan limit into the values a
//! usage bar needs: a percentage and whether to nudge the user toward an
//! upgrade.
//!
//! # Example
//!
//! ```rust,ignore
//! use leadgate::billing::UsageSummary;
//!
//! let summary = UsageSummary::from_state(&state);
//! if summary.team_members.should_prompt_upgrade() {
//!     show_upgrade_banner();
//! }
//! ```

use serde::Serialize;

use super::plans::Limit;
use super::subscription::SubscriptionState;

/// Fraction of a finite limit at which the upgrade prompt appears.
pub const DEFAULT_UPGRADE_THRESHOLD: f64 = 0.8;

/// Bring a threshold into `(0, 1]`. NaN becomes the default.
pub(crate) fn normalize_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        DEFAULT_UPGRADE_THRESHOLD
    } else {
        threshold.clamp(f64::MIN_POSITIVE, 1.0)
    }
}

/// Usage of one limited resource.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMeter {
    pub used: u32,
    pub total: Limit,
    #[serde(skip)]
    threshold: f64,
}

impl UsageMeter {
    #[must_use]
    pub fn new(used: u32, total: Limit) -> Self {
        Self {
            used,
            total,
            threshold: DEFAULT_UPGRADE_THRESHOLD,
        }
    }

    /// Use a different upgrade threshold (a fraction of the total).
    ///
    /// Values outside `(0, 1]` are clamped and NaN falls back to
    /// [`DEFAULT_UPGRADE_THRESHOLD`].
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = normalize_threshold(threshold);
        self
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Percent of the limit in use.
    ///
    /// Always 0 for unlimited totals. A finite total of 0 reads as full. Not
    /// clamped: usage over the limit reports more than 100.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        match self.total {
            Limit::Unlimited => 0.0,
            Limit::Finite(0) => 100.0,
            Limit::Finite(total) => f64::from(self.used) / f64::from(total) * 100.0,
        }
    }

    /// Check if usage has reached the upgrade threshold of a finite limit.
    #[must_use]
    pub fn should_prompt_upgrade(&self) -> bool {
        match self.total {
            Limit::Unlimited => false,
            Limit::Finite(total) => f64::from(self.used) >= f64::from(total) * self.threshold,
        }
    }

    /// Units left before the limit.
    #[must_use]
    pub fn remaining(&self) -> Limit {
        self.total.remaining(self.used)
    }

    /// Check if usage has reached or passed the limit.
    #[must_use]
    pub fn is_at_limit(&self) -> bool {
        !self.remaining().has_capacity()
    }
}

/// Meters for every limited resource of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub leads: UsageMeter,
    pub team_members: UsageMeter,
    pub pipeline_stages: UsageMeter,
}

impl UsageSummary {
    /// Build meters from the state's plan limits, usage counters and upgrade
    /// threshold.
    #[must_use]
    pub fn from_state(state: &SubscriptionState) -> Self {
        let access = state.access();
        let usage = state.usage();

        Self {
            leads: UsageMeter::new(usage.total_leads, access.max_leads()),
            team_members: UsageMeter::new(usage.total_team_members, access.max_team_members()),
            pipeline_stages: UsageMeter::new(usage.total_pipeline_stages, access.max_pipeline_stages()),
        }
        .with_threshold(state.upgrade_threshold())
    }

    /// Apply one upgrade threshold to every meter.
    #[must_use]
    pub fn with_threshold(self, threshold: f64) -> Self {
        Self {
            leads: self.leads.with_threshold(threshold),
            team_members: self.team_members.with_threshold(threshold),
            pipeline_stages: self.pipeline_stages.with_threshold(threshold),
        }
    }

    /// Check if any meter wants to prompt an upgrade.
    #[must_use]
    pub fn any_upgrade_prompt(&self) -> bool {
        self.leads.should_prompt_upgrade()
            || self.team_members.should_prompt_upgrade()
            || self.pipeline_stages.should_prompt_upgrade()
    }
}
