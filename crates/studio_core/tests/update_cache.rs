use pretty_assertions::assert_eq;
use studio_core::{
    update, ApiTag, AppState, CachedData, Effect, Msg, QueryKey, QueryStatus,
    QueueAndProcessorStatus,
};

fn queue_status(pending: u32) -> CachedData {
    let mut status = QueueAndProcessorStatus::default();
    status.queue.pending = pending;
    CachedData::QueueStatus(status)
}

fn apply(state: AppState, msgs: Vec<Msg>) -> (AppState, Vec<Effect>) {
    msgs.into_iter().fold((state, Vec::new()), |(state, _), msg| update(state, msg))
}

#[test]
fn fulfilled_query_is_readable_and_fresh() {
    let (state, _) = apply(
        AppState::new(),
        vec![
            Msg::QuerySubscribed {
                key: QueryKey::QueueStatus,
            },
            Msg::QueryStarted {
                key: QueryKey::QueueStatus,
            },
        ],
    );
    assert_eq!(
        state.api.entry(&QueryKey::QueueStatus).unwrap().status,
        QueryStatus::Pending
    );

    let (state, _) = update(
        state,
        Msg::QueryFulfilled {
            key: QueryKey::QueueStatus,
            data: queue_status(2),
        },
    );
    assert_eq!(state.queue_status().unwrap().queue.pending, 2);
    assert_eq!(
        state.api.fresh_data(&QueryKey::QueueStatus),
        Some(&queue_status(2))
    );
}

#[test]
fn rejected_query_keeps_previous_data() {
    let (state, _) = apply(
        AppState::new(),
        vec![
            Msg::QueryFulfilled {
                key: QueryKey::QueueStatus,
                data: queue_status(3),
            },
            Msg::QueryRejected {
                key: QueryKey::QueueStatus,
                error: "network error".to_string(),
            },
        ],
    );
    let entry = state.api.entry(&QueryKey::QueueStatus).unwrap();
    assert_eq!(entry.status, QueryStatus::Rejected("network error".to_string()));
    assert_eq!(state.queue_status().unwrap().queue.pending, 3);
}

#[test]
fn invalidation_refetches_only_subscribed_queries() {
    let boards = QueryKey::BoardList;
    let images = QueryKey::ImageList { board_id: None };
    let (state, _) = apply(
        AppState::new(),
        vec![
            Msg::QuerySubscribed { key: boards.clone() },
            Msg::QueryFulfilled {
                key: boards.clone(),
                data: CachedData::Json(serde_json::json!([])),
            },
            Msg::QueryFulfilled {
                key: images.clone(),
                data: CachedData::Json(serde_json::json!({"items": []})),
            },
        ],
    );

    let (state, effects) = update(state, Msg::InvalidateTags(vec![ApiTag::FetchOnReconnect]));
    assert_eq!(effects, vec![Effect::FetchQuery { key: boards.clone() }]);

    // Unsubscribed entries keep their data but are no longer served from cache.
    assert!(state.api.entry(&images).unwrap().stale);
    assert!(state.api.data(&images).is_some());
    assert!(state.api.fresh_data(&images).is_none());
}

#[test]
fn invalidation_ignores_unrelated_tags() {
    let (state, _) = apply(
        AppState::new(),
        vec![
            Msg::QuerySubscribed {
                key: QueryKey::QueueStatus,
            },
            Msg::QueryFulfilled {
                key: QueryKey::QueueStatus,
                data: queue_status(1),
            },
        ],
    );
    let (state, effects) = update(state, Msg::InvalidateTags(vec![ApiTag::Board]));

    assert!(effects.is_empty());
    assert!(!state.api.entry(&QueryKey::QueueStatus).unwrap().stale);
}

#[test]
fn unsubscribe_saturates_at_zero() {
    let (state, _) = apply(
        AppState::new(),
        vec![
            Msg::QuerySubscribed {
                key: QueryKey::QueueItems,
            },
            Msg::QueryUnsubscribed {
                key: QueryKey::QueueItems,
            },
            Msg::QueryUnsubscribed {
                key: QueryKey::QueueItems,
            },
            // Unknown keys are ignored rather than created.
            Msg::QueryUnsubscribed {
                key: QueryKey::BoardList,
            },
        ],
    );
    assert_eq!(state.api.entry(&QueryKey::QueueItems).unwrap().subscribers, 0);
    assert!(state.api.entry(&QueryKey::BoardList).is_none());
}

#[test]
fn refetch_after_invalidation_clears_staleness() {
    let (state, _) = apply(
        AppState::new(),
        vec![
            Msg::QueryFulfilled {
                key: QueryKey::QueueStatus,
                data: queue_status(1),
            },
            Msg::InvalidateTags(vec![ApiTag::SessionQueueStatus]),
        ],
    );
    assert!(state.api.fresh_data(&QueryKey::QueueStatus).is_none());

    let (state, _) = update(
        state,
        Msg::QueryFulfilled {
            key: QueryKey::QueueStatus,
            data: queue_status(0),
        },
    );
    assert_eq!(
        state.api.fresh_data(&QueryKey::QueueStatus),
        Some(&queue_status(0))
    );
}
