//! Conditional rendering decisions.
//!
//! A [`Gate`] wraps a piece of UI that requires a capability. It carries up to
//! five selectors; the first one present, in the order feature, pipeline,
//! lead, analytics, integration, decides. A gate with no selectors is open.
//!
//! ```rust,ignore
//! use leadgate::billing::{Gate, GateView};
//!
//! let view = Gate::new()
//!     .lead("canBulkEdit")
//!     .render(&state.access(), || bulk_edit_toolbar(), None);
//!
//! match view {
//!     GateView::Content(toolbar) => show(toolbar),
//!     GateView::Fallback(other) => show(other),
//!     GateView::UpgradeRequired { show_upgrade_button } => show_upgrade(show_upgrade_button),
//! }
//! ```

use std::fmt;

use super::entitlements::{FeatureAccess, FeatureCheckResult};

/// The selector a gate was decided by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateSelector {
    Feature,
    Pipeline,
    Lead,
    Analytics,
    Integration,
}

impl GateSelector {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Pipeline => "pipeline",
            Self::Lead => "lead",
            Self::Analytics => "analytics",
            Self::Integration => "integration",
        }
    }
}

impl fmt::Display for GateSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a gate stayed closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub selector: GateSelector,
    pub key: String,
    pub reason: FeatureCheckResult,
    pub show_upgrade_button: bool,
}

/// Result of evaluating a gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Granted,
    Denied(Denial),
}

impl GateDecision {
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// What to display for a gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView<T> {
    /// Access granted; show the gated content.
    Content(T),
    /// Access denied; show the caller's substitute.
    Fallback(T),
    /// Access denied and no substitute; show an upgrade prompt.
    UpgradeRequired { show_upgrade_button: bool },
}

/// A capability gate around a piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Gate {
    feature: Option<String>,
    pipeline: Option<String>,
    lead: Option<String>,
    analytics: Option<String>,
    integration: Option<String>,
    show_upgrade_button: bool,
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

impl Gate {
    /// An open gate that shows the upgrade button when denied.
    pub fn new() -> Self {
        Self {
            feature: None,
            pipeline: None,
            lead: None,
            analytics: None,
            integration: None,
            show_upgrade_button: true,
        }
    }

    /// Gate on a top-level flag or dotted capability path.
    pub fn feature(mut self, key: impl Into<String>) -> Self {
        self.feature = non_empty(key.into());
        self
    }

    /// Gate on a pipeline stage capability.
    pub fn pipeline(mut self, key: impl Into<String>) -> Self {
        self.pipeline = non_empty(key.into());
        self
    }

    /// Gate on a lead management capability.
    pub fn lead(mut self, key: impl Into<String>) -> Self {
        self.lead = non_empty(key.into());
        self
    }

    /// Gate on an analytics capability.
    pub fn analytics(mut self, key: impl Into<String>) -> Self {
        self.analytics = non_empty(key.into());
        self
    }

    /// Gate on an integration.
    pub fn integration(mut self, key: impl Into<String>) -> Self {
        self.integration = non_empty(key.into());
        self
    }

    pub fn show_upgrade_button(mut self, show: bool) -> Self {
        self.show_upgrade_button = show;
        self
    }

    /// The deciding selector and its key, if any.
    #[must_use]
    pub fn selector(&self) -> Option<(GateSelector, &str)> {
        [
            (GateSelector::Feature, &self.feature),
            (GateSelector::Pipeline, &self.pipeline),
            (GateSelector::Lead, &self.lead),
            (GateSelector::Analytics, &self.analytics),
            (GateSelector::Integration, &self.integration),
        ]
        .into_iter()
        .find_map(|(selector, key)| key.as_deref().map(|k| (selector, k)))
    }

    /// Decide the gate against the current access.
    #[must_use]
    pub fn evaluate(&self, access: &FeatureAccess<'_>) -> GateDecision {
        let Some((selector, key)) = self.selector() else {
            return GateDecision::Granted;
        };

        let result = match selector {
            GateSelector::Feature => access.check_feature(key),
            GateSelector::Pipeline => access.check_pipeline_feature(key),
            GateSelector::Lead => access.check_lead_feature(key),
            GateSelector::Analytics => access.check_analytics_feature(key),
            GateSelector::Integration => access.check_integration_feature(key),
        };

        if result.is_allowed() {
            return GateDecision::Granted;
        }

        tracing::debug!(
            target: "leadgate::subscription",
            plan_id = access.plan_id().unwrap_or("unknown"),
            selector = %selector,
            key = %key,
            reason = ?result,
            "Feature gate denied"
        );

        GateDecision::Denied(Denial {
            selector,
            key: key.to_string(),
            reason: result,
            show_upgrade_button: self.show_upgrade_button,
        })
    }

    /// Choose what to display. `content` is only built when access is granted.
    pub fn render<T>(
        &self,
        access: &FeatureAccess<'_>,
        content: impl FnOnce() -> T,
        fallback: Option<T>,
    ) -> GateView<T> {
        match self.evaluate(access) {
            GateDecision::Granted => GateView::Content(content()),
            GateDecision::Denied(denial) => match fallback {
                Some(fallback) => GateView::Fallback(fallback),
                None => GateView::UpgradeRequired {
                    show_upgrade_button: denial.show_upgrade_button,
                },
            },
        }
    }
}

fn non_empty(key: String) -> Option<String> {
    if key.is_empty() { None } else { Some(key) }
}
