//! Studio core: pure client state machine, query cache and connection session.
mod api_cache;
mod connection;
mod effect;
mod msg;
mod nodes;
mod queue;
mod state;
mod update;

pub use api_cache::{ApiState, ApiTag, CacheEntry, CachedData, QueryKey, QueryStatus};
pub use connection::{ConnectionKind, ConnectionSession};
pub use effect::Effect;
pub use msg::Msg;
pub use nodes::{NodeTemplate, NodeTemplates, NodeTemplatesState, SchemaStatus};
pub use queue::{QueueAndProcessorStatus, SessionProcessorStatus, SessionQueueStatus};
pub use state::{AppState, ConfigState, SystemState, Tab};
pub use update::update;
