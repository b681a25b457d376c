//! Audit logging for subscription changes.
//!
//! Plan and billing-cycle changes are user-visible, monetized actions, so the
//! manager reports each one to a [`SubscriptionAuditLogger`].

use std::fmt;

/// Audit event types for subscription operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionAuditEvent {
    /// Organization switched to another plan.
    PlanChanged {
        organization_id: String,
        from_plan: String,
        to_plan: String,
    },
    /// Organization switched billing cycle.
    BillingTypeChanged {
        organization_id: String,
        from: String,
        to: String,
    },
    /// A plan or billing change was rejected.
    ChangeRejected {
        organization_id: String,
        reason: String,
    },
    /// A saved plan id no longer exists in the catalog.
    UnknownPlanRestored {
        organization_id: String,
        plan_id: String,
    },
}

impl fmt::Display for SubscriptionAuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlanChanged { organization_id, from_plan, to_plan } => {
                write!(f, "Plan changed: org={}, from={}, to={}", organization_id, from_plan, to_plan)
            }
            Self::BillingTypeChanged { organization_id, from, to } => {
                write!(f, "Billing type changed: org={}, from={}, to={}", organization_id, from, to)
            }
            Self::ChangeRejected { organization_id, reason } => {
                write!(f, "Change rejected: org={}, reason={}", organization_id, reason)
            }
            Self::UnknownPlanRestored { organization_id, plan_id } => {
                write!(f, "Unknown plan restored: org={}, plan={}", organization_id, plan_id)
            }
        }
    }
}

/// Trait for audit logging backends.
///
/// Implementations should handle failures themselves; logging must not
/// disrupt the plan change it reports.
#[allow(async_fn_in_trait)]
pub trait SubscriptionAuditLogger: Send + Sync {
    /// Log a subscription audit event.
    async fn log(&self, event: SubscriptionAuditEvent);
}

/// No-op audit logger that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpAuditLogger;

impl SubscriptionAuditLogger for NoOpAuditLogger {
    async fn log(&self, _event: SubscriptionAuditEvent) {}
}

/// Tracing-based audit logger.
///
/// Logs audit events using the `tracing` crate at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLogger;

impl SubscriptionAuditLogger for TracingAuditLogger {
    async fn log(&self, event: SubscriptionAuditEvent) {
        tracing::info!(
            target: "leadgate::audit",
            event_type = %event_kind(&event),
            "{}", event
        );
    }
}

/// Get the event kind as a string for structured logging.
pub(crate) fn event_kind(event: &SubscriptionAuditEvent) -> &'static str {
    match event {
        SubscriptionAuditEvent::PlanChanged { .. } => "plan_changed",
        SubscriptionAuditEvent::BillingTypeChanged { .. } => "billing_type_changed",
        SubscriptionAuditEvent::ChangeRejected { .. } => "change_rejected",
        SubscriptionAuditEvent::UnknownPlanRestored { .. } => "unknown_plan_restored",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Test audit logger that captures events.
    #[derive(Default, Clone)]
    pub struct TestAuditLogger {
        pub events: Arc<Mutex<Vec<SubscriptionAuditEvent>>>,
    }

    impl TestAuditLogger {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn events(&self) -> Vec<SubscriptionAuditEvent> {
            self.events.lock().await.clone()
        }
    }

    impl SubscriptionAuditLogger for TestAuditLogger {
        async fn log(&self, event: SubscriptionAuditEvent) {
            self.events.lock().await.push(event);
        }
    }

    #[tokio::test]
    async fn test_noop_logger() {
        NoOpAuditLogger
            .log(SubscriptionAuditEvent::PlanChanged {
                organization_id: "org_123".to_string(),
                from_plan: "free".to_string(),
                to_plan: "starter".to_string(),
            })
            .await;
    }

    #[tokio::test]
    async fn test_capturing_logger() {
        let logger = TestAuditLogger::new();

        logger
            .log(SubscriptionAuditEvent::PlanChanged {
                organization_id: "org_123".to_string(),
                from_plan: "free".to_string(),
                to_plan: "growth".to_string(),
            })
            .await;
        logger
            .log(SubscriptionAuditEvent::BillingTypeChanged {
                organization_id: "org_123".to_string(),
                from: "monthly".to_string(),
                to: "annual".to_string(),
            })
            .await;

        let events = logger.events().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SubscriptionAuditEvent::PlanChanged { .. }));
        assert!(matches!(events[1], SubscriptionAuditEvent::BillingTypeChanged { .. }));
    }

    #[test]
    fn test_event_display() {
        let event = SubscriptionAuditEvent::PlanChanged {
            organization_id: "org_123".to_string(),
            from_plan: "starter".to_string(),
            to_plan: "pro".to_string(),
        };
        assert_eq!(event.to_string(), "Plan changed: org=org_123, from=starter, to=pro");
    }

    #[test]
    fn test_event_kind() {
        assert_eq!(
            event_kind(&SubscriptionAuditEvent::ChangeRejected {
                organization_id: String::new(),
                reason: String::new(),
            }),
            "change_rejected"
        );
        assert_eq!(
            event_kind(&SubscriptionAuditEvent::UnknownPlanRestored {
                organization_id: String::new(),
                plan_id: String::new(),
            }),
            "unknown_plan_restored"
        );
    }
}
