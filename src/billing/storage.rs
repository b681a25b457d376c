//! Storage traits for subscription data.
//!
//! Persistence lives outside this crate. Implement [`SubscriptionStore`] over
//! whatever backend holds organization profiles; an in-memory implementation
//! is provided for testing.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::subscription::BillingType;

/// Trait for storing the selected plan and billing cycle of an organization.
///
/// A missing record is `Ok(None)`, not an error. The manager maps it to the
/// default subscription.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Load the saved subscription for an organization.
    async fn load(&self, organization_id: &str) -> Result<Option<StoredSubscription>>;

    /// Save/update the subscription for an organization.
    async fn save(&self, organization_id: &str, subscription: &StoredSubscription) -> Result<()>;

    /// Delete the subscription record (default: no-op).
    async fn delete(&self, _organization_id: &str) -> Result<()> {
        Ok(())
    }
}

/// Persisted subscription selection.
///
/// Only the plan id and billing cycle are stored. Usage counters are
/// recomputed by their owners and never persisted here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubscription {
    /// Plan ID. May name a plan that no longer exists.
    pub plan_id: String,
    /// Billing cycle.
    pub billing_type: BillingType,
    /// Last updated timestamp (Unix seconds).
    pub updated_at: u64,
}

impl StoredSubscription {
    /// Create a record stamped with the current time.
    #[must_use]
    pub fn new(plan_id: impl Into<String>, billing_type: BillingType) -> Self {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            plan_id: plan_id.into(),
            billing_type,
            updated_at: now,
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod test {
    use super::*;
    use crate::error::LeadgateError;
    use std::collections::HashMap;
    use std::sync::{Arc, RwLock};

    /// In-memory subscription store for testing.
    ///
    /// Wraps data in Arc for cheap cloning.
    #[derive(Default, Clone)]
    pub struct InMemorySubscriptionStore {
        subscriptions: Arc<RwLock<HashMap<String, StoredSubscription>>>,
    }

    impl InMemorySubscriptionStore {
        /// Create a new in-memory store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all subscriptions (for testing).
        pub fn get_all(&self) -> HashMap<String, StoredSubscription> {
            self.subscriptions
                .read()
                .map(|s| s.clone())
                .unwrap_or_default()
        }

        /// Seed a record directly, bypassing validation.
        pub fn seed(&self, organization_id: &str, subscription: StoredSubscription) {
            if let Ok(mut store) = self.subscriptions.write() {
                store.insert(organization_id.to_string(), subscription);
            }
        }
    }

    #[async_trait]
    impl SubscriptionStore for InMemorySubscriptionStore {
        async fn load(&self, organization_id: &str) -> Result<Option<StoredSubscription>> {
            let store = self
                .subscriptions
                .read()
                .map_err(|_| LeadgateError::storage("subscription store lock poisoned"))?;
            Ok(store.get(organization_id).cloned())
        }

        async fn save(&self, organization_id: &str, subscription: &StoredSubscription) -> Result<()> {
            let mut store = self
                .subscriptions
                .write()
                .map_err(|_| LeadgateError::storage("subscription store lock poisoned"))?;
            store.insert(organization_id.to_string(), subscription.clone());
            Ok(())
        }

        async fn delete(&self, organization_id: &str) -> Result<()> {
            let mut store = self
                .subscriptions
                .write()
                .map_err(|_| LeadgateError::storage("subscription store lock poisoned"))?;
            store.remove(organization_id);
            Ok(())
        }
    }
}
