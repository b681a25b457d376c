use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use leadgate::billing::{
    BillingType, StoredSubscription, SubscriptionError, SubscriptionManager, SubscriptionStore,
    UsageCounters, UsageSummary,
};
use leadgate::{ConfigBuilder, LeadgateError, Result};

/// Store backed by a JSON document per organization, the way a profile
/// service would hold it.
#[derive(Clone, Default)]
struct JsonDocumentStore {
    documents: Arc<Mutex<HashMap<String, String>>>,
}

impl JsonDocumentStore {
    fn raw(&self, organization_id: &str) -> Option<String> {
        self.documents.lock().unwrap().get(organization_id).cloned()
    }

    fn put_raw(&self, organization_id: &str, document: &str) {
        self.documents
            .lock()
            .unwrap()
            .insert(organization_id.to_string(), document.to_string());
    }
}

#[async_trait]
impl SubscriptionStore for JsonDocumentStore {
    async fn load(&self, organization_id: &str) -> Result<Option<StoredSubscription>> {
        match self.raw(organization_id) {
            Some(document) => Ok(Some(serde_json::from_str(&document)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, organization_id: &str, subscription: &StoredSubscription) -> Result<()> {
        let document = serde_json::to_string(subscription)?;
        self.put_raw(organization_id, &document);
        Ok(())
    }
}

#[tokio::test]
async fn test_plan_change_survives_new_session() {
    let store = JsonDocumentStore::default();
    let manager = SubscriptionManager::new(store.clone());

    let mut state = manager
        .load_state("org_acme", UsageCounters::new(80, 1, 5))
        .await
        .unwrap();
    assert_eq!(state.plan_id(), "free");
    assert!(state.access().remaining_leads().has_capacity());

    manager.change_plan("org_acme", &mut state, "growth").await.unwrap();
    manager
        .change_billing_type("org_acme", &mut state, "annual")
        .await
        .unwrap();

    // A fresh session sees the persisted choice; usage comes from the caller
    let next = manager
        .load_state("org_acme", UsageCounters::new(81, 2, 5))
        .await
        .unwrap();
    assert_eq!(next.plan_id(), "growth");
    assert_eq!(next.billing_type(), BillingType::Annual);
    assert_eq!(next.current_price_cents(), Some(79_000));
    assert_eq!(next.usage().total_leads, 81);

    let document = store.raw("org_acme").unwrap();
    assert!(document.contains("\"planId\":\"growth\""));
    assert!(document.contains("\"billingType\":\"annual\""));
}

#[tokio::test]
async fn test_rejected_changes_do_not_persist() {
    let store = JsonDocumentStore::default();
    let manager = SubscriptionManager::new(store.clone());
    let mut state = manager.load_state("org_acme", UsageCounters::default()).await.unwrap();

    let err = manager
        .change_plan("org_acme", &mut state, "platinum")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown plan: platinum");

    let err = manager
        .change_billing_type("org_acme", &mut state, "quarterly")
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_subscription(),
        Some(SubscriptionError::InvalidBillingType { value }) if value == "quarterly"
    ));

    assert_eq!(state.plan_id(), "free");
    assert_eq!(state.billing_type(), BillingType::Monthly);
    assert!(store.raw("org_acme").is_none());
}

#[tokio::test]
async fn test_retired_plan_in_storage_fails_closed() {
    let store = JsonDocumentStore::default();
    store.put_raw(
        "org_legacy",
        r#"{"planId":"enterprise","billingType":"annual","updatedAt":1700000000}"#,
    );
    let manager = SubscriptionManager::new(store);

    let mut state = manager.load_state("org_legacy", UsageCounters::default()).await.unwrap();
    assert_eq!(state.plan_id(), "enterprise");
    assert!(state.current_plan().is_none());
    assert!(!state.access().can_access_analytics_feature("basic"));

    // Moving to a real plan recovers
    manager.change_plan("org_legacy", &mut state, "starter").await.unwrap();
    assert!(state.access().can_access_analytics_feature("basic"));
}

#[tokio::test]
async fn test_malformed_record_is_storage_error() {
    let store = JsonDocumentStore::default();
    store.put_raw("org_broken", r#"{"planId":"pro","billingType":"weekly","updatedAt":0}"#);
    let manager = SubscriptionManager::new(store);

    let err = manager.load_state("org_broken", UsageCounters::default()).await.unwrap_err();
    assert!(matches!(err, LeadgateError::Storage(_)));
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn test_configured_defaults_apply_to_new_organizations() {
    let config = ConfigBuilder::new()
        .with_default_plan("starter")
        .with_default_billing(BillingType::Annual)
        .build()
        .unwrap();
    let manager = SubscriptionManager::new(JsonDocumentStore::default()).with_config(&config.subscription);

    let state = manager.load_state("org_trial", UsageCounters::default()).await.unwrap();
    assert_eq!(state.plan_id(), "starter");
    assert_eq!(state.current_price_cents(), Some(29_000));
}

#[tokio::test]
async fn test_configured_upgrade_threshold_applies_to_usage_meters() {
    let config = ConfigBuilder::new().with_upgrade_threshold(0.5).build().unwrap();
    let manager = SubscriptionManager::new(JsonDocumentStore::default()).with_config(&config.subscription);

    let state = manager
        .load_state("org_acme", UsageCounters::new(60, 0, 0))
        .await
        .unwrap();
    let summary = UsageSummary::from_state(&state);

    assert_eq!(summary.leads.threshold(), 0.5);
    assert!(summary.leads.should_prompt_upgrade());
}
