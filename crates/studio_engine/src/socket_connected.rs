//! Recovery work performed when the real-time connection comes back.
//!
//! While the socket is down the only thing that can change server-side is
//! the queue finishing items. The queue status is used as a proxy: if it
//! differs from the last known one, everything tagged `FetchOnReconnect` is
//! invalidated. Node templates are reloaded separately when missing.
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use studio_core::{
    ApiTag, AppState, ConnectionKind, ConnectionSession, Msg, QueryKey, Tab,
};
use studio_logging::{studio_debug, studio_trace, Namespace};

use crate::listener::{Listener, ListenerContext, ListenerId, ListenerMiddleware, TaskAborted};
use crate::{ApiError, ApiSettings, FailureKind, QueryOptions};

/// Random wait applied before a remote reconnect check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceWindow {
    pub min: Duration,
    pub max: Duration,
}

impl Default for DebounceWindow {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(1000),
            max: Duration::from_millis(2000),
        }
    }
}

impl DebounceWindow {
    /// Uniformly distributed in `min..=max`; `min` if the window is inverted.
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecoverySettings {
    /// Remote backend address; absent or empty for the local default.
    pub base_url: Option<String>,
    pub debounce: DebounceWindow,
}

impl RecoverySettings {
    pub fn from_api(settings: &ApiSettings) -> Self {
        Self {
            base_url: settings.remote_base_url().map(ToOwned::to_owned),
            debounce: DebounceWindow::default(),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.base_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

/// What a queue recovery run concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// Nothing to recover from on the first connection.
    FirstConnection,
    Unchanged,
    Invalidated,
    /// Best effort: the status could not be fetched, nothing was invalidated.
    StatusUnavailable(ApiError),
}

pub struct QueueRecoveryListener {
    session: Arc<ConnectionSession>,
    settings: RecoverySettings,
}

impl QueueRecoveryListener {
    pub fn new(session: Arc<ConnectionSession>, settings: RecoverySettings) -> Self {
        Self { session, settings }
    }

    pub async fn recover(&self, ctx: &ListenerContext) -> Result<RecoveryOutcome, TaskAborted> {
        if self.session.observe_connection() == ConnectionKind::First {
            return Ok(RecoveryOutcome::FirstConnection);
        }

        let previous = ctx.select(|state| state.queue_status().cloned());

        if self.settings.is_remote() {
            // Coalesce reconnect bursts against remote servers.
            ctx.cancel_active_listeners();
            ctx.delay(self.settings.debounce.sample()).await?;
        }

        // Only the debounce is cancellable; a fetched status always reaches the comparison.
        let mut request = ctx.initiate(QueryKey::QueueStatus, QueryOptions::forced());
        let fetched = request.result().await;
        request.unsubscribe();

        let next = match fetched.and_then(|data| {
            data.into_queue_status().ok_or_else(|| {
                ApiError::new(
                    FailureKind::Decode,
                    "queue status query returned another payload",
                )
            })
        }) {
            Ok(status) => status,
            Err(err) => return Ok(RecoveryOutcome::StatusUnavailable(err)),
        };

        if !next.queue_changed_since(previous.as_ref()) {
            return Ok(RecoveryOutcome::Unchanged);
        }

        ctx.dispatch(Msg::InvalidateTags(vec![ApiTag::FetchOnReconnect]));
        Ok(RecoveryOutcome::Invalidated)
    }
}

#[async_trait::async_trait]
impl Listener for QueueRecoveryListener {
    fn name(&self) -> &'static str {
        "socket-connected/queue-recovery"
    }

    fn matches(&self, msg: &Msg) -> bool {
        matches!(msg, Msg::SocketConnected)
    }

    async fn effect(&self, _msg: Msg, ctx: ListenerContext) -> Result<(), TaskAborted> {
        studio_debug!(Namespace::Socketio, "Connected");

        match self.recover(&ctx).await? {
            RecoveryOutcome::FirstConnection => {
                studio_trace!(Namespace::Socketio, "First connection, nothing to recover");
            }
            RecoveryOutcome::Unchanged => {
                studio_trace!(Namespace::Queue, "Queue status unchanged across reconnect");
            }
            RecoveryOutcome::Invalidated => {
                studio_debug!(
                    Namespace::Queue,
                    "Queue status changed while disconnected, refetching"
                );
            }
            RecoveryOutcome::StatusUnavailable(err) => {
                studio_debug!(
                    Namespace::Socketio,
                    "Unable to get current queue status on reconnect: {}",
                    err
                );
            }
        }
        Ok(())
    }
}

/// Reloads node templates when none are loaded.
///
/// Runs on every connect, including the first, without debounce. The
/// schema request is submitted and not awaited.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaRecoveryListener;

impl SchemaRecoveryListener {
    pub fn should_refresh(state: &AppState) -> bool {
        state.node_templates.is_empty() && !state.config.is_tab_disabled(Tab::Nodes)
    }
}

#[async_trait::async_trait]
impl Listener for SchemaRecoveryListener {
    fn name(&self) -> &'static str {
        "socket-connected/schema-recovery"
    }

    fn matches(&self, msg: &Msg) -> bool {
        matches!(msg, Msg::SocketConnected)
    }

    async fn effect(&self, _msg: Msg, ctx: ListenerContext) -> Result<(), TaskAborted> {
        if ctx.select(Self::should_refresh) {
            studio_debug!(Namespace::Schema, "No node templates loaded, requesting schema");
            ctx.dispatch(Msg::SchemaRequested);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketConnectedListeners {
    pub queue_recovery: ListenerId,
    pub schema_recovery: ListenerId,
}

pub fn add_socket_connected_listeners(
    middleware: &ListenerMiddleware,
    session: Arc<ConnectionSession>,
    settings: RecoverySettings,
) -> SocketConnectedListeners {
    SocketConnectedListeners {
        queue_recovery: middleware
            .start_listening(Arc::new(QueueRecoveryListener::new(session, settings))),
        schema_recovery: middleware.start_listening(Arc::new(SchemaRecoveryListener)),
    }
}
