use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use studio_core::{update, AppState, CachedData, Effect, Msg, QueryKey};
use studio_logging::{studio_debug, studio_trace, studio_warn, Namespace};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio_util::task::TaskTracker;

use crate::listener::ListenerMiddleware;
use crate::schema::parse_openapi_schema;
use crate::{ApiClient, ApiError, FailureKind};

/// Sees every action before it reaches the reducer.
pub trait ActionObserver: Send + Sync {
    fn observe(&self, msg: &Msg);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryOptions {
    /// Contact the backend even when fresh data is cached.
    pub force_refetch: bool,
}

impl QueryOptions {
    pub fn forced() -> Self {
        Self {
            force_refetch: true,
        }
    }
}

type QueryReply = oneshot::Sender<Result<CachedData, ApiError>>;

/// Owns the application state and runs the effects `update` asks for.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: Mutex<AppState>,
    api: Arc<dyn ApiClient>,
    listeners: ListenerMiddleware,
    observers: Mutex<Vec<Arc<dyn ActionObserver>>>,
    tasks: TaskTracker,
    runtime: Handle,
}

impl Store {
    pub fn new(api: Arc<dyn ApiClient>, runtime: Handle) -> Self {
        Self::with_state(AppState::new(), api, runtime)
    }

    pub fn with_state(state: AppState, api: Arc<dyn ApiClient>, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(state),
                api,
                listeners: ListenerMiddleware::new(),
                observers: Mutex::new(Vec::new()),
                tasks: TaskTracker::new(),
                runtime,
            }),
        }
    }

    pub fn listeners(&self) -> &ListenerMiddleware {
        &self.inner.listeners
    }

    pub fn add_observer(&self, observer: Arc<dyn ActionObserver>) {
        lock(&self.inner.observers).push(observer);
    }

    pub fn get_state(&self) -> AppState {
        lock(&self.inner.state).clone()
    }

    pub fn select<T>(&self, selector: impl FnOnce(&AppState) -> T) -> T {
        selector(&lock(&self.inner.state))
    }

    /// Applies `msg` and then hands it to matching listeners. Effects and
    /// listener bodies run on the runtime; this never waits on I/O.
    pub fn dispatch(&self, msg: Msg) {
        studio_trace!(Namespace::Store, "dispatch {:?}", msg);
        let observers = lock(&self.inner.observers).clone();
        for observer in &observers {
            observer.observe(&msg);
        }

        let effects = {
            let mut state = lock(&self.inner.state);
            let current = std::mem::take(&mut *state);
            let (next, effects) = update(current, msg.clone());
            *state = next;
            effects
        };

        for effect in effects {
            self.run_effect(effect);
        }

        self.inner.listeners.notify(&msg, self);
    }

    /// Subscribes to `key` and resolves it, from cache when allowed.
    pub fn initiate(&self, key: QueryKey, options: QueryOptions) -> QueryRequest {
        self.dispatch(Msg::QuerySubscribed { key: key.clone() });

        let (reply, result) = oneshot::channel();
        let cached = if options.force_refetch {
            None
        } else {
            self.select(|state| state.api.fresh_data(&key).cloned())
        };
        match cached {
            Some(data) => {
                let _ = reply.send(Ok(data));
            }
            None => self.spawn_query(key.clone(), Some(reply)),
        }

        QueryRequest {
            store: self.clone(),
            key,
            result: Some(result),
            subscribed: true,
        }
    }

    /// Cancels running listeners and waits for all spawned work to finish.
    pub async fn shutdown(&self) {
        self.inner.listeners.cancel_all();
        self.inner.tasks.close();
        self.inner.tasks.wait().await;
        studio_debug!(Namespace::Store, "Store shut down");
    }

    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.inner.tasks.spawn_on(task, &self.inner.runtime);
    }

    fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::FetchQuery { key } => self.spawn_query(key, None),
            Effect::FetchSchema => self.spawn_schema_fetch(),
        }
    }

    fn spawn_query(&self, key: QueryKey, reply: Option<QueryReply>) {
        self.dispatch(Msg::QueryStarted { key: key.clone() });

        let store = self.clone();
        self.spawn(async move {
            let result = store.inner.api.fetch_query(&key).await;
            match &result {
                Ok(data) => store.dispatch(Msg::QueryFulfilled {
                    key: key.clone(),
                    data: data.clone(),
                }),
                Err(err) => {
                    studio_debug!(Namespace::Api, "Query {:?} failed: {}", key, err);
                    store.dispatch(Msg::QueryRejected {
                        key: key.clone(),
                        error: err.to_string(),
                    });
                }
            }
            if let Some(reply) = reply {
                let _ = reply.send(result);
            }
        });
    }

    fn spawn_schema_fetch(&self) {
        let store = self.clone();
        self.spawn(async move {
            let msg = match store.inner.api.fetch_openapi_schema().await {
                Ok(document) => match parse_openapi_schema(&document) {
                    Ok(templates) => Msg::SchemaReceived(templates),
                    Err(err) => Msg::SchemaFailed(err.to_string()),
                },
                Err(err) => Msg::SchemaFailed(err.to_string()),
            };
            if let Msg::SchemaFailed(reason) = &msg {
                studio_warn!(Namespace::Schema, "Failed to load OpenAPI schema: {}", reason);
            }
            store.dispatch(msg);
        });
    }
}

/// An in-flight or resolved query subscription.
///
/// The subscription is released by [`QueryRequest::unsubscribe`] or, failing
/// that, when the request is dropped.
pub struct QueryRequest {
    store: Store,
    key: QueryKey,
    result: Option<oneshot::Receiver<Result<CachedData, ApiError>>>,
    subscribed: bool,
}

impl QueryRequest {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Waits for the query outcome. Can be awaited once.
    pub async fn result(&mut self) -> Result<CachedData, ApiError> {
        let Some(result) = self.result.take() else {
            return Err(ApiError::new(
                FailureKind::Cancelled,
                "query result already consumed",
            ));
        };
        result.await.unwrap_or_else(|_| Err(ApiError::cancelled()))
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if std::mem::replace(&mut self.subscribed, false) {
            self.store.dispatch(Msg::QueryUnsubscribed {
                key: self.key.clone(),
            });
        }
    }
}

impl Drop for QueryRequest {
    fn drop(&mut self) {
        self.release();
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
