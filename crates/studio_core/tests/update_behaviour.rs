use std::sync::Once;

use pretty_assertions::assert_eq;
use studio_core::{
    update, AppState, Effect, Msg, NodeTemplate, NodeTemplates, SchemaStatus, Tab,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(studio_logging::initialize_for_tests);
}

fn one_template() -> NodeTemplates {
    let mut templates = NodeTemplates::new();
    templates.insert(
        "add".to_string(),
        NodeTemplate {
            node_type: "add".to_string(),
            title: "Add Integers".to_string(),
            version: "1.0.0".to_string(),
            category: Some("math".to_string()),
            tags: vec!["math".to_string()],
        },
    );
    templates
}

#[test]
fn socket_events_toggle_connection_flag() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SocketConnected);
    assert!(state.system.is_connected);
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::SocketDisconnected);
    assert!(!state.system.is_connected);
}

#[test]
fn config_change_replaces_disabled_tabs() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::ConfigChanged {
            disabled_tabs: vec![Tab::Nodes, Tab::UnifiedCanvas],
        },
    );
    assert!(state.config.is_tab_disabled(Tab::Nodes));
    assert!(!state.config.is_tab_disabled(Tab::Queue));

    let (state, _) = update(
        state,
        Msg::ConfigChanged {
            disabled_tabs: Vec::new(),
        },
    );
    assert!(!state.config.is_tab_disabled(Tab::Nodes));
}

#[test]
fn schema_request_emits_fetch_and_coalesces_while_pending() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SchemaRequested);
    assert_eq!(effects, vec![Effect::FetchSchema]);
    assert_eq!(state.node_templates.status, SchemaStatus::Pending);

    let (state, effects) = update(state, Msg::SchemaRequested);
    assert!(effects.is_empty());
    assert_eq!(state.node_templates.status, SchemaStatus::Pending);
}

#[test]
fn schema_received_stores_templates() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SchemaRequested);
    let (state, effects) = update(state, Msg::SchemaReceived(one_template()));

    assert!(effects.is_empty());
    assert_eq!(state.node_templates.status, SchemaStatus::Ready);
    assert_eq!(state.node_templates.templates.len(), 1);
    assert!(!state.node_templates.is_empty());
}

#[test]
fn schema_failure_keeps_templates_and_allows_retry() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SchemaReceived(one_template()));
    let (state, _) = update(state, Msg::SchemaRequested);
    let (state, _) = update(state, Msg::SchemaFailed("http status 500".to_string()));

    assert_eq!(
        state.node_templates.status,
        SchemaStatus::Failed("http status 500".to_string())
    );
    assert_eq!(state.node_templates.templates.len(), 1);

    let (_, effects) = update(state, Msg::SchemaRequested);
    assert_eq!(effects, vec![Effect::FetchSchema]);
}
