//! Leadgate - subscription feature gating for lead-management SaaS
//!
//! Leadgate decides what an organization may do based on its subscription
//! plan. Every capability check fails closed: an unknown plan, an unknown
//! capability key, or a missing record all read as "not included".
//!
//! # Features
//!
//! - **Plans**: a fixed four-tier catalog (free, starter, growth, pro)
//! - **Entitlements**: boolean capability checks and numeric limits
//! - **Gates**: which of content, fallback, or upgrade prompt to show
//! - **Usage**: percentage and upgrade-prompt logic for usage meters
//! - **Persistence**: a pluggable async store for the selected plan
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use leadgate::{self, ConfigBuilder};
//! use leadgate::billing::{SubscriptionManager, TracingAuditLogger, UsageCounters};
//!
//! #[tokio::main]
//! async fn main() -> leadgate::Result<()> {
//!     // Initialize logging
//!     leadgate::init_tracing();
//!
//!     let config = ConfigBuilder::new()
//!         .from_env()
//!         .build()?;
//!
//!     let manager = SubscriptionManager::with_audit_logger(store, TracingAuditLogger)
//!         .with_config(&config.subscription);
//!
//!     let state = manager.load_state("org_123", UsageCounters::default()).await?;
//!     if state.access().can_access_feature("apiAccess") {
//!         // ...
//!     }
//!     Ok(())
//! }
//! ```

pub mod billing;
mod config;
mod error;
mod utils;

// Re-exports for public API
pub use config::{Config, ConfigBuilder, LoggingConfig, SubscriptionConfig};
pub use error::{LeadgateError, Result};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// Call this once, early in `main()`.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "leadgate=debug")
/// - `LEADGATE_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("LEADGATE_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    let env_filter = EnvFilter::new(&config.logging.level);

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
