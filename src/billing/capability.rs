//! Capability keys.
//!
//! Every boolean leaf in [`PlanFeatures`] has a typed key. Keys are parsed
//! from the camelCase names the front-end uses (`canBulkEdit`) and from their
//! snake_case spelling (`can_bulk_edit`). Nested leaves are addressed with a
//! dotted path such as `pipelineStages.canAdd`, or by the bare leaf name when
//! only one group has that leaf (`canBulkEdit`, `advanced`, `crm`). A leaf
//! present in several groups (`canDelete`) needs its dotted path.
//!
//! Parsing returns `None` for anything unrecognized; the evaluator treats that
//! as a denial. Use [`Capability::from_str`](std::str::FromStr) when an
//! unknown key should be reported as an error instead (for example when
//! validating gate configuration at startup).

use std::fmt;
use std::str::FromStr;

use super::error::SubscriptionError;
use super::plans::{
    AnalyticsFeatures, IntegrationFeatures, LeadManagementFeatures, PipelineStageFeatures,
    PlanFeatures,
};

/// Pipeline stage editor capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineCapability {
    CanAdd,
    CanEdit,
    CanDelete,
}

impl PipelineCapability {
    pub const ALL: [Self; 3] = [Self::CanAdd, Self::CanEdit, Self::CanDelete];

    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "canAdd" | "can_add" => Some(Self::CanAdd),
            "canEdit" | "can_edit" => Some(Self::CanEdit),
            "canDelete" | "can_delete" => Some(Self::CanDelete),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CanAdd => "canAdd",
            Self::CanEdit => "canEdit",
            Self::CanDelete => "canDelete",
        }
    }

    #[must_use]
    pub fn enabled_in(&self, features: &PipelineStageFeatures) -> bool {
        match self {
            Self::CanAdd => features.can_add,
            Self::CanEdit => features.can_edit,
            Self::CanDelete => features.can_delete,
        }
    }
}

/// Lead list capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeadCapability {
    CanImport,
    CanExport,
    CanBulkEdit,
    CanDelete,
}

impl LeadCapability {
    pub const ALL: [Self; 4] = [
        Self::CanImport,
        Self::CanExport,
        Self::CanBulkEdit,
        Self::CanDelete,
    ];

    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "canImport" | "can_import" => Some(Self::CanImport),
            "canExport" | "can_export" => Some(Self::CanExport),
            "canBulkEdit" | "can_bulk_edit" => Some(Self::CanBulkEdit),
            "canDelete" | "can_delete" => Some(Self::CanDelete),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CanImport => "canImport",
            Self::CanExport => "canExport",
            Self::CanBulkEdit => "canBulkEdit",
            Self::CanDelete => "canDelete",
        }
    }

    #[must_use]
    pub fn enabled_in(&self, features: &LeadManagementFeatures) -> bool {
        match self {
            Self::CanImport => features.can_import,
            Self::CanExport => features.can_export,
            Self::CanBulkEdit => features.can_bulk_edit,
            Self::CanDelete => features.can_delete,
        }
    }
}

/// Reporting capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnalyticsCapability {
    Basic,
    Advanced,
    CustomReports,
}

impl AnalyticsCapability {
    pub const ALL: [Self; 3] = [Self::Basic, Self::Advanced, Self::CustomReports];

    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "basic" => Some(Self::Basic),
            "advanced" => Some(Self::Advanced),
            "customReports" | "custom_reports" => Some(Self::CustomReports),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
            Self::CustomReports => "customReports",
        }
    }

    #[must_use]
    pub fn enabled_in(&self, features: &AnalyticsFeatures) -> bool {
        match self {
            Self::Basic => features.basic,
            Self::Advanced => features.advanced,
            Self::CustomReports => features.custom_reports,
        }
    }
}

/// Integration capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntegrationCapability {
    Crm,
    Email,
    Calendar,
    Custom,
}

impl IntegrationCapability {
    pub const ALL: [Self; 4] = [Self::Crm, Self::Email, Self::Calendar, Self::Custom];

    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "crm" => Some(Self::Crm),
            "email" => Some(Self::Email),
            "calendar" => Some(Self::Calendar),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crm => "crm",
            Self::Email => "email",
            Self::Calendar => "calendar",
            Self::Custom => "custom",
        }
    }

    #[must_use]
    pub fn enabled_in(&self, features: &IntegrationFeatures) -> bool {
        match self {
            Self::Crm => features.crm,
            Self::Email => features.email,
            Self::Calendar => features.calendar,
            Self::Custom => features.custom,
        }
    }
}

/// Any boolean capability of a plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    ApiAccess,
    PrioritySupport,
    Pipeline(PipelineCapability),
    Lead(LeadCapability),
    Analytics(AnalyticsCapability),
    Integration(IntegrationCapability),
}

impl Capability {
    /// Parse a top-level flag (`apiAccess`), a dotted path to a nested leaf
    /// (`leadManagement.canExport`), or a bare leaf that only one group has
    /// (`canExport`).
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        let Some((group, leaf)) = key.split_once('.') else {
            return match key {
                "apiAccess" | "api_access" => Some(Self::ApiAccess),
                "prioritySupport" | "priority_support" => Some(Self::PrioritySupport),
                _ => Self::parse_bare_leaf(key),
            };
        };

        match group {
            "pipelineStages" | "pipeline_stages" => PipelineCapability::parse(leaf).map(Self::Pipeline),
            "leadManagement" | "lead_management" => LeadCapability::parse(leaf).map(Self::Lead),
            "analytics" => AnalyticsCapability::parse(leaf).map(Self::Analytics),
            "integrations" => IntegrationCapability::parse(leaf).map(Self::Integration),
            _ => None,
        }
    }

    /// Resolve a leaf name across all groups. Ambiguous names resolve to nothing.
    fn parse_bare_leaf(leaf: &str) -> Option<Self> {
        let mut matches = [
            PipelineCapability::parse(leaf).map(Self::Pipeline),
            LeadCapability::parse(leaf).map(Self::Lead),
            AnalyticsCapability::parse(leaf).map(Self::Analytics),
            IntegrationCapability::parse(leaf).map(Self::Integration),
        ]
        .into_iter()
        .flatten();

        match (matches.next(), matches.next()) {
            (Some(cap), None) => Some(cap),
            _ => None,
        }
    }

    /// Read the literal flag from a plan's features.
    #[must_use]
    pub fn enabled_in(&self, features: &PlanFeatures) -> bool {
        match self {
            Self::ApiAccess => features.api_access,
            Self::PrioritySupport => features.priority_support,
            Self::Pipeline(cap) => cap.enabled_in(&features.pipeline_stages),
            Self::Lead(cap) => cap.enabled_in(&features.lead_management),
            Self::Analytics(cap) => cap.enabled_in(&features.analytics),
            Self::Integration(cap) => cap.enabled_in(&features.integrations),
        }
    }

    /// Every capability in the plan model.
    pub fn all() -> impl Iterator<Item = Capability> {
        [Self::ApiAccess, Self::PrioritySupport]
            .into_iter()
            .chain(PipelineCapability::ALL.into_iter().map(Self::Pipeline))
            .chain(LeadCapability::ALL.into_iter().map(Self::Lead))
            .chain(AnalyticsCapability::ALL.into_iter().map(Self::Analytics))
            .chain(IntegrationCapability::ALL.into_iter().map(Self::Integration))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiAccess => write!(f, "apiAccess"),
            Self::PrioritySupport => write!(f, "prioritySupport"),
            Self::Pipeline(cap) => write!(f, "pipelineStages.{}", cap.as_str()),
            Self::Lead(cap) => write!(f, "leadManagement.{}", cap.as_str()),
            Self::Analytics(cap) => write!(f, "analytics.{}", cap.as_str()),
            Self::Integration(cap) => write!(f, "integrations.{}", cap.as_str()),
        }
    }
}

impl FromStr for Capability {
    type Err = SubscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| SubscriptionError::UnknownCapability { key: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_top_level() {
        assert_eq!(Capability::parse("apiAccess"), Some(Capability::ApiAccess));
        assert_eq!(Capability::parse("priority_support"), Some(Capability::PrioritySupport));
    }

    #[test]
    fn test_parse_dotted_paths() {
        assert_eq!(
            Capability::parse("pipelineStages.canAdd"),
            Some(Capability::Pipeline(PipelineCapability::CanAdd))
        );
        assert_eq!(
            Capability::parse("lead_management.can_bulk_edit"),
            Some(Capability::Lead(LeadCapability::CanBulkEdit))
        );
        assert_eq!(
            Capability::parse("integrations.calendar"),
            Some(Capability::Integration(IntegrationCapability::Calendar))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_and_non_boolean_keys() {
        assert_eq!(Capability::parse("teleport"), None);
        assert_eq!(Capability::parse(""), None);
        // Groups and numeric limits are not boolean capabilities
        assert_eq!(Capability::parse("pipelineStages"), None);
        assert_eq!(Capability::parse("maxLeads"), None);
        assert_eq!(Capability::parse("pipelineStages.maxStages"), None);
        assert_eq!(Capability::parse("billing.canAdd"), None);
        assert_eq!(Capability::parse("analytics.advanced.extra"), None);
    }

    #[test]
    fn test_parse_unique_bare_leaves() {
        assert_eq!(
            Capability::parse("canAdd"),
            Some(Capability::Pipeline(PipelineCapability::CanAdd))
        );
        assert_eq!(
            Capability::parse("can_bulk_edit"),
            Some(Capability::Lead(LeadCapability::CanBulkEdit))
        );
        assert_eq!(
            Capability::parse("advanced"),
            Some(Capability::Analytics(AnalyticsCapability::Advanced))
        );
        assert_eq!(
            Capability::parse("crm"),
            Some(Capability::Integration(IntegrationCapability::Crm))
        );
        // Pipeline stages and leads both have canDelete
        assert_eq!(Capability::parse("canDelete"), None);
        assert_eq!(Capability::parse("can_delete"), None);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for cap in Capability::all() {
            assert_eq!(Capability::parse(&cap.to_string()), Some(cap));
        }
        assert_eq!(Capability::all().count(), 16);
    }

    #[test]
    fn test_from_str_reports_unknown_key() {
        let err = "analytics.realtime".parse::<Capability>().unwrap_err();
        assert_eq!(
            err,
            SubscriptionError::UnknownCapability {
                key: "analytics.realtime".to_string()
            }
        );
    }
}
