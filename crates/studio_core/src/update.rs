use crate::{AppState, Effect, Msg, QueryStatus, SchemaStatus};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SocketConnected => {
            state.system.is_connected = true;
            Vec::new()
        }
        Msg::SocketDisconnected => {
            state.system.is_connected = false;
            Vec::new()
        }
        Msg::ConfigChanged { disabled_tabs } => {
            state.config.disabled_tabs = disabled_tabs;
            Vec::new()
        }
        Msg::QuerySubscribed { key } => {
            state.api.entry_mut(key).subscribers += 1;
            Vec::new()
        }
        Msg::QueryUnsubscribed { key } => {
            if let Some(entry) = state.api.existing_mut(&key) {
                entry.subscribers = entry.subscribers.saturating_sub(1);
            }
            Vec::new()
        }
        Msg::QueryStarted { key } => {
            state.api.entry_mut(key).status = QueryStatus::Pending;
            Vec::new()
        }
        Msg::QueryFulfilled { key, data } => {
            let entry = state.api.entry_mut(key);
            entry.data = Some(data);
            entry.status = QueryStatus::Fulfilled;
            entry.stale = false;
            Vec::new()
        }
        Msg::QueryRejected { key, error } => {
            // Previous data stays readable; a failed refresh is not an empty result.
            state.api.entry_mut(key).status = QueryStatus::Rejected(error);
            Vec::new()
        }
        Msg::InvalidateTags(tags) => state
            .api
            .invalidate(&tags)
            .into_iter()
            .map(|key| Effect::FetchQuery { key })
            .collect(),
        Msg::SchemaRequested => {
            if state.node_templates.status == SchemaStatus::Pending {
                return (state, Vec::new());
            }
            state.node_templates.status = SchemaStatus::Pending;
            vec![Effect::FetchSchema]
        }
        Msg::SchemaReceived(templates) => {
            state.node_templates.templates = templates;
            state.node_templates.status = SchemaStatus::Ready;
            Vec::new()
        }
        Msg::SchemaFailed(message) => {
            state.node_templates.status = SchemaStatus::Failed(message);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
