//! Listener middleware: async reactions to dispatched actions.
//!
//! Each matching dispatch starts a new listener instance with its own
//! cancellation token. An instance can cancel the older running instances of
//! the same listener, which makes their pending `delay`/`pause` calls fail
//! with [`TaskAborted`].
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use studio_core::{AppState, Msg, QueryKey};
use studio_logging::{studio_debug, studio_trace, Namespace};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::store::{lock, QueryOptions, QueryRequest, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("listener task aborted")]
pub struct TaskAborted;

#[async_trait::async_trait]
pub trait Listener: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, msg: &Msg) -> bool;

    async fn effect(&self, msg: Msg, ctx: ListenerContext) -> Result<(), TaskAborted>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    id: ListenerId,
    listener: Arc<dyn Listener>,
    active: Mutex<HashMap<u64, CancellationToken>>,
}

impl ListenerEntry {
    fn cancel_older(&self, instance: u64) -> usize {
        let active = lock(&self.active);
        let mut cancelled = 0;
        for (other, token) in active.iter() {
            if *other < instance && !token.is_cancelled() {
                token.cancel();
                cancelled += 1;
            }
        }
        cancelled
    }

    fn cancel_all(&self) {
        for token in lock(&self.active).values() {
            token.cancel();
        }
    }
}

pub struct ListenerMiddleware {
    entries: Mutex<Vec<Arc<ListenerEntry>>>,
    next_id: AtomicU64,
    root: CancellationToken,
}

impl ListenerMiddleware {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            root: CancellationToken::new(),
        }
    }

    pub fn start_listening(&self, listener: Arc<dyn Listener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        studio_debug!(Namespace::Listener, "Listening: {} ({:?})", listener.name(), id);
        lock(&self.entries).push(Arc::new(ListenerEntry {
            id,
            listener,
            active: Mutex::new(HashMap::new()),
        }));
        id
    }

    /// Removes a listener. Returns false if `id` was not registered.
    pub fn stop_listening(&self, id: ListenerId, cancel_active: bool) -> bool {
        let removed = {
            let mut entries = lock(&self.entries);
            let position = entries.iter().position(|entry| entry.id == id);
            position.map(|index| entries.remove(index))
        };
        match removed {
            Some(entry) => {
                if cancel_active {
                    entry.cancel_all();
                }
                true
            }
            None => false,
        }
    }

    /// Number of instances of `id` currently running.
    pub fn active_instances(&self, id: ListenerId) -> usize {
        lock(&self.entries)
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| lock(&entry.active).len())
            .unwrap_or(0)
    }

    pub(crate) fn cancel_all(&self) {
        self.root.cancel();
    }

    pub(crate) fn notify(&self, msg: &Msg, store: &Store) {
        let entries = lock(&self.entries).clone();
        for entry in entries {
            if !entry.listener.matches(msg) {
                continue;
            }

            let instance = self.next_id.fetch_add(1, Ordering::Relaxed);
            let token = self.root.child_token();
            lock(&entry.active).insert(instance, token.clone());

            let ctx = ListenerContext {
                store: store.clone(),
                entry: entry.clone(),
                instance,
                token,
            };
            let msg = msg.clone();
            let registration = ActiveInstance {
                entry: entry.clone(),
                instance,
            };
            store.spawn(async move {
                let _registration = registration;
                let listener = entry.listener.clone();
                if listener.effect(msg, ctx).await.is_err() {
                    studio_trace!(
                        Namespace::Listener,
                        "{} instance {} aborted",
                        listener.name(),
                        instance
                    );
                }
            });
        }
    }
}

/// Deregisters a running instance when its task finishes, unwinds or is dropped.
struct ActiveInstance {
    entry: Arc<ListenerEntry>,
    instance: u64,
}

impl Drop for ActiveInstance {
    fn drop(&mut self) {
        lock(&self.entry.active).remove(&self.instance);
    }
}

/// Handed to each listener instance.
pub struct ListenerContext {
    store: Store,
    entry: Arc<ListenerEntry>,
    instance: u64,
    token: CancellationToken,
}

impl ListenerContext {
    pub fn dispatch(&self, msg: Msg) {
        self.store.dispatch(msg);
    }

    pub fn get_state(&self) -> AppState {
        self.store.get_state()
    }

    pub fn select<T>(&self, selector: impl FnOnce(&AppState) -> T) -> T {
        self.store.select(selector)
    }

    pub fn initiate(&self, key: QueryKey, options: QueryOptions) -> QueryRequest {
        self.store.initiate(key, options)
    }

    /// Cancels the running instances of this listener started before this one.
    ///
    /// Instances started by later dispatches are left alone even if their
    /// task has not been polled yet.
    pub fn cancel_active_listeners(&self) {
        let cancelled = self.entry.cancel_older(self.instance);
        if cancelled > 0 {
            studio_trace!(
                Namespace::Listener,
                "{} cancelled {} older instance(s)",
                self.entry.listener.name(),
                cancelled
            );
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn delay(&self, duration: Duration) -> Result<(), TaskAborted> {
        self.pause(tokio::time::sleep(duration)).await
    }

    /// Awaits `future` unless this instance is cancelled first.
    pub async fn pause<F: Future>(&self, future: F) -> Result<F::Output, TaskAborted> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(TaskAborted),
            output = future => Ok(output),
        }
    }
}
