//! Studio engine: store, listener middleware, backend API and reconnect recovery.
mod api;
mod listener;
mod schema;
mod socket_connected;
mod store;
mod types;

pub use api::{ApiClient, ApiSettings, ReqwestApi, DEFAULT_ORIGIN};
pub use listener::{Listener, ListenerContext, ListenerId, ListenerMiddleware, TaskAborted};
pub use schema::{parse_openapi_schema, SchemaError};
pub use socket_connected::{
    add_socket_connected_listeners, DebounceWindow, QueueRecoveryListener, RecoveryOutcome,
    RecoverySettings, SchemaRecoveryListener, SocketConnectedListeners,
};
pub use store::{ActionObserver, QueryOptions, QueryRequest, Store};
pub use types::{ApiError, FailureKind};
