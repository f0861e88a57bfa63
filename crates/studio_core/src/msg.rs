use crate::{ApiTag, CachedData, NodeTemplates, QueryKey, Tab};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The real-time connection was (re)established.
    SocketConnected,
    /// The real-time connection dropped.
    SocketDisconnected,
    /// Server-provided config changed which tabs are disabled.
    ConfigChanged { disabled_tabs: Vec<Tab> },
    /// A consumer started reading a query.
    QuerySubscribed { key: QueryKey },
    /// A consumer stopped reading a query.
    QueryUnsubscribed { key: QueryKey },
    /// A request for a query went out.
    QueryStarted { key: QueryKey },
    QueryFulfilled { key: QueryKey, data: CachedData },
    QueryRejected { key: QueryKey, error: String },
    /// Marks every query providing one of the tags as stale.
    InvalidateTags(Vec<ApiTag>),
    /// Ask for the OpenAPI schema to be (re)loaded into node templates.
    SchemaRequested,
    SchemaReceived(NodeTemplates),
    SchemaFailed(String),
    NoOp,
}
