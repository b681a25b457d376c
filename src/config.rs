use serde::{Deserialize, Serialize};

use crate::billing::{BillingType, DEFAULT_UPGRADE_THRESHOLD, Plans};
use crate::error::LeadgateError;
use crate::utils::get_env_with_prefix;

/// Main configuration for leadgate
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub subscription: SubscriptionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

/// Subscription defaults and display settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SubscriptionConfig {
    /// Plan for organizations with no stored subscription.
    #[serde(default = "default_plan")]
    pub default_plan: String,
    #[serde(default)]
    pub default_billing: BillingType,
    /// Fraction of a finite limit at which usage meters prompt an upgrade.
    #[serde(default = "default_upgrade_threshold")]
    pub upgrade_threshold: f64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            default_plan: default_plan(),
            default_billing: BillingType::default(),
            upgrade_threshold: default_upgrade_threshold(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

fn default_plan() -> String {
    Plans::catalog().lowest_tier().id.to_string()
}

fn default_upgrade_threshold() -> f64 {
    DEFAULT_UPGRADE_THRESHOLD
}

/// Builder for Config with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    pub fn with_subscription(mut self, subscription: SubscriptionConfig) -> Self {
        self.config.subscription = subscription;
        self
    }

    pub fn with_default_plan(mut self, plan_id: impl Into<String>) -> Self {
        self.config.subscription.default_plan = plan_id.into();
        self
    }

    pub fn with_default_billing(mut self, billing: BillingType) -> Self {
        self.config.subscription.default_billing = billing;
        self
    }

    pub fn with_upgrade_threshold(mut self, threshold: f64) -> Self {
        self.config.subscription.upgrade_threshold = threshold;
        self
    }

    /// Load configuration from environment variables with LEADGATE_ prefix
    pub fn from_env(mut self) -> Self {
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }
        if let Some(plan) = get_env_with_prefix("DEFAULT_PLAN") {
            self.config.subscription.default_plan = plan;
        }
        // Unparseable values keep the default; build() only sees valid billing types
        if let Some(billing) = get_env_with_prefix("DEFAULT_BILLING") {
            if let Ok(billing) = BillingType::parse(&billing) {
                self.config.subscription.default_billing = billing;
            }
        }
        if let Some(threshold) = get_env_with_prefix("UPGRADE_THRESHOLD") {
            if let Ok(t) = threshold.parse() {
                self.config.subscription.upgrade_threshold = t;
            }
        }

        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration is invalid:
    /// - Invalid log level
    /// - Default plan not in the catalog
    /// - Upgrade threshold outside `(0, 1]`
    pub fn build(self) -> crate::error::Result<Config> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(LeadgateError::config(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let plans = Plans::catalog();
        if !plans.contains(&self.config.subscription.default_plan) {
            return Err(LeadgateError::config(format!(
                "Default plan '{}' is not in the catalog. Must be one of: {}",
                self.config.subscription.default_plan,
                plans.plan_ids().join(", ")
            )));
        }

        let threshold = self.config.subscription.upgrade_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(LeadgateError::config(format!(
                "Upgrade threshold must be in (0, 1], got: {}",
                threshold
            )));
        }

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
