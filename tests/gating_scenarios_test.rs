use leadgate::billing::{
    Capability, FeatureAccess, Gate, GateView, Limit, Plans, SubscriptionState, UsageCounters,
    UsageSummary,
};

fn state_on(plan_id: &str, usage: UsageCounters) -> SubscriptionState {
    let mut state = SubscriptionState::new();
    state.set_plan(plan_id).unwrap();
    state.set_usage(usage);
    state
}

#[test]
fn test_starter_organization_session() {
    let state = state_on("starter", UsageCounters::new(420, 3, 6));
    let access = state.access();

    // Pipeline editor: add and edit, no delete
    assert!(access.can_access_pipeline_feature("canAdd"));
    assert!(access.can_access_pipeline_feature("canEdit"));
    assert!(!access.can_access_pipeline_feature("canDelete"));
    assert_eq!(access.max_pipeline_stages(), Limit::Finite(10));

    // Lead list
    assert_eq!(access.remaining_leads(), Limit::Finite(580));
    assert!(access.can_access_lead_feature("canExport"));
    assert!(!access.can_access_lead_feature("canBulkEdit"));

    // Team roster is full
    assert_eq!(access.remaining_team_members(), Limit::Finite(0));
    assert!(!access.can_add_team_member());

    let summary = UsageSummary::from_state(&state);
    assert_eq!(summary.team_members.percentage(), 100.0);
    assert!(summary.team_members.should_prompt_upgrade());
}

#[test]
fn test_upgrade_unlocks_features_immediately() {
    let mut state = state_on("starter", UsageCounters::new(420, 3, 6));
    let gate = Gate::new().feature("apiAccess");

    assert_eq!(
        gate.render(&state.access(), || "api keys", None),
        GateView::UpgradeRequired { show_upgrade_button: true }
    );

    state.set_plan("growth").unwrap();
    assert_eq!(gate.render(&state.access(), || "api keys", None), GateView::Content("api keys"));
    assert_eq!(state.access().remaining_team_members(), Limit::Finite(7));
}

#[test]
fn test_pro_is_unlimited() {
    let state = state_on("pro", UsageCounters::new(250_000, 40, 60));
    let access = state.access();

    assert_eq!(access.remaining_leads(), Limit::Unlimited);
    assert_eq!(i64::from(access.remaining_team_members()), -1);
    assert!(access.can_add_pipeline_stage());
    assert!(Capability::all().all(|cap| access.has(cap)));

    let summary = UsageSummary::from_state(&state);
    assert_eq!(summary.leads.percentage(), 0.0);
    assert!(!summary.any_upgrade_prompt());
}

#[test]
fn test_downgrade_with_excess_usage_never_goes_negative() {
    let state = state_on("free", UsageCounters::new(5_000, 8, 20));
    let access = state.access();

    assert_eq!(access.remaining_leads(), Limit::Finite(0));
    assert_eq!(access.remaining_team_members(), Limit::Finite(0));
    assert_eq!(access.remaining_pipeline_stages(), Limit::Finite(0));
    assert!(UsageSummary::from_state(&state).leads.percentage() > 100.0);
}

#[test]
fn test_unknown_plan_denies_everything() {
    let mut state = SubscriptionState::restore("enterprise_legacy", Default::default());
    state.set_usage(UsageCounters::new(1, 1, 1));
    let access = state.access();

    for cap in Capability::all() {
        assert!(!access.can_access_feature(&cap.to_string()));
    }
    assert_eq!(access.max_leads(), Limit::Finite(0));
    assert_eq!(
        Gate::new().analytics("basic").render(&access, || (), None),
        GateView::UpgradeRequired { show_upgrade_button: true }
    );
}

#[test]
fn test_gate_fallback_and_priority() {
    let access = FeatureAccess::for_plan(Plans::catalog().get("growth").unwrap());

    // Feature selector decides even when a later selector would pass
    let view = Gate::new()
        .feature("prioritySupport")
        .integration("crm")
        .show_upgrade_button(false)
        .render(&access, || "support chat", Some("help center"));
    assert_eq!(view, GateView::Fallback("help center"));

    let view = Gate::new()
        .feature("prioritySupport")
        .show_upgrade_button(false)
        .render(&access, || "support chat", None);
    assert_eq!(view, GateView::UpgradeRequired { show_upgrade_button: false });

    // No selectors: open
    assert_eq!(Gate::new().render(&access, || 1, Some(2)), GateView::Content(1));
}

#[test]
fn test_catalog_is_served_with_wire_limits() {
    let json = Plans::catalog().to_json().unwrap();
    let plans = json.as_array().unwrap();

    assert_eq!(plans.len(), 4);
    assert_eq!(plans[0]["id"], "free");
    assert_eq!(plans[1]["features"]["maxTeamMembers"], 3);
    assert_eq!(plans[3]["features"]["pipelineStages"]["maxStages"], -1);
}

#[test]
fn test_free_plan_pipeline_gate() {
    let state = state_on("free", UsageCounters::new(10, 1, 2));
    let gate = Gate::new().pipeline("canAdd");

    assert_eq!(
        gate.render(&state.access(), || "add stage", Some("stages are read-only")),
        GateView::Fallback("stages are read-only")
    );
    assert_eq!(
        gate.render(&state.access(), || "add stage", None),
        GateView::UpgradeRequired { show_upgrade_button: true }
    );
}

#[test]
fn test_growth_advanced_analytics_gate() {
    let state = state_on("growth", UsageCounters::default());
    let view = Gate::new().analytics("advanced").render(&state.access(), || "charts", None);
    assert_eq!(view, GateView::Content("charts"));
}
