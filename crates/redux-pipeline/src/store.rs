use crate::error::StoreError;
use crate::middleware::{Dispatcher, Middleware, Next, SharedMiddleware};
use crate::pipeline;
use crate::reducer::Reducer;
use crate::subscription::{Subscribers, Subscription};
use parking_lot::{Mutex, ReentrantMutex};
use redux_pipeline_config::StoreConfig;
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

/// Store - holds application state and runs the dispatch pipeline
///
/// The Store follows the Redux pattern:
/// - Centralized state, replaced (never mutated) on each action
/// - Actions are dispatched through a middleware chain
/// - A pure reducer computes the next state
/// - Subscribers are notified after every state change
///
/// `Store` is a cheap handle: clones share the same state, middleware and
/// subscribers. Dispatching is synchronous and reentrant. A middleware may
/// dispatch again, and that nested dispatch completes before control returns
/// to it. Dispatches from other threads wait until the outermost dispatch in
/// progress has returned.
///
/// # Example
///
/// ```rust
/// use redux_pipeline::{LoggingMiddleware, Store};
///
/// #[derive(Debug)]
/// enum Action {
///     Add(i32),
///     Reset,
/// }
///
/// fn reduce(action: &Action, state: &i32) -> i32 {
///     match action {
///         Action::Add(amount) => state + amount,
///         Action::Reset => 0,
///     }
/// }
///
/// let store = Store::builder(reduce, 0)
///     .middleware(LoggingMiddleware::new())
///     .build();
///
/// store.dispatch(Action::Add(2)).unwrap();
/// store.dispatch(Action::Add(3)).unwrap();
/// assert_eq!(store.state(), 5);
///
/// store.dispatch(Action::Reset).unwrap();
/// assert_eq!(store.state(), 0);
/// ```
pub struct Store<S, A> {
    shared: Arc<Shared<S, A>>,
}

pub(crate) struct Shared<S, A> {
    gate: ReentrantMutex<DispatchFrame>,
    state: Mutex<Arc<S>>,
    reducer: Reducer<S, A>,
    middleware: Mutex<Vec<SharedMiddleware<S, A>>>,
    subscribers: Arc<Mutex<Subscribers<S>>>,
    config: StoreConfig,
}

/// Bookkeeping for the dispatch currently running on the gate-holding thread
#[derive(Default)]
struct DispatchFrame {
    depth: Cell<usize>,
    reducing: Cell<bool>,
}

/// Restores a cell to its previous value when dropped, on error and panic paths too
struct CellGuard<'a, T: Copy> {
    cell: &'a Cell<T>,
    previous: T,
}

impl<'a, T: Copy> CellGuard<'a, T> {
    fn set(cell: &'a Cell<T>, value: T) -> Self {
        let previous = cell.replace(value);
        Self { cell, previous }
    }
}

impl<T: Copy> Drop for CellGuard<'_, T> {
    fn drop(&mut self) {
        self.cell.set(self.previous);
    }
}

impl<S, A> Shared<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: fmt::Debug + Send + 'static,
{
    pub(crate) fn dispatch(this: &Arc<Self>, action: A) -> Result<(), StoreError> {
        let frame = this.gate.lock();

        if frame.reducing.get() {
            log::warn!("Rejected {:?}: dispatch called from inside the reducer", action);
            return Err(StoreError::DispatchDuringReduce);
        }

        let depth = frame.depth.get() + 1;
        if let Some(limit) = this.config.max_dispatch_depth {
            if depth > limit {
                log::warn!("Rejected {:?}: dispatch depth limit {} reached", action, limit);
                return Err(StoreError::DispatchDepthExceeded { limit });
            }
        }
        let _depth = CellGuard::set(&frame.depth, depth);

        if this.config.log_actions {
            log::debug!("dispatch[{}] {:?}", depth, action);
        }

        // Resolve the chain from the list as it is now
        let middleware = this.middleware.lock().clone();
        let entry = pipeline::compose(
            &middleware,
            &Dispatcher::new(Arc::clone(this)),
            Self::terminal(this),
        );

        let result = entry.call(action);
        if this.config.log_actions {
            match &result {
                Ok(()) => log::debug!("dispatch[{}] done", depth),
                Err(e) => log::debug!("dispatch[{}] failed: {}", depth, e),
            }
        }
        result
    }

    fn terminal(this: &Arc<Self>) -> Next<A> {
        let shared = Arc::clone(this);
        Next::new(move |action| shared.reduce_and_notify(action))
    }

    /// Terminal step: reduce, replace state, notify subscribers
    fn reduce_and_notify(&self, action: A) -> Result<(), StoreError> {
        let frame = self.gate.lock();

        let current = Arc::clone(&self.state.lock());
        let next_state = {
            let _reducing = CellGuard::set(&frame.reducing, true);
            Arc::new(self.reducer.reduce(&action, &current)?)
        };
        *self.state.lock() = Arc::clone(&next_state);
        log::trace!("State replaced by {:?}", action);

        // Registrations made during this round apply from the next one
        let subscribers = self.subscribers.lock().snapshot();
        for subscriber in subscribers {
            subscriber(&next_state);
        }

        Ok(())
    }

    pub(crate) fn state(&self) -> S {
        S::clone(&self.state.lock())
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("middleware", &self.shared.middleware.lock().len())
            .field("subscribers", &self.shared.subscribers.lock().len())
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl<S, A> Store<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: fmt::Debug + Send + 'static,
{
    /// Create a store with a reducer, an initial state and a middleware list
    ///
    /// Uses the default [`StoreConfig`]; see [`Store::builder`] for more options.
    pub fn new<R>(reducer: R, initial_state: S, middleware: Vec<SharedMiddleware<S, A>>) -> Self
    where
        R: Fn(&A, &S) -> S + Send + Sync + 'static,
    {
        Self::builder(reducer, initial_state)
            .middleware_list(middleware)
            .build()
    }

    /// Start building a store around an infallible reducer
    pub fn builder<R>(reducer: R, initial_state: S) -> StoreBuilder<S, A>
    where
        R: Fn(&A, &S) -> S + Send + Sync + 'static,
    {
        StoreBuilder::new(Reducer::infallible(reducer), initial_state)
    }

    /// Start building a store around a reducer that can fail
    ///
    /// A reducer error aborts the dispatch with [`StoreError::Reducer`] and
    /// leaves the state untouched.
    pub fn fallible_builder<R>(reducer: R, initial_state: S) -> StoreBuilder<S, A>
    where
        R: Fn(&A, &S) -> anyhow::Result<S> + Send + Sync + 'static,
    {
        StoreBuilder::new(Reducer::fallible(reducer), initial_state)
    }

    /// Dispatch an action through the middleware chain and reducer
    ///
    /// Returns once the whole pipeline has completed, including nested
    /// dispatches and every resulting subscriber notification.
    pub fn dispatch(&self, action: A) -> Result<(), StoreError> {
        Shared::dispatch(&self.shared, action)
    }

    /// Get the current state
    pub fn state(&self) -> S {
        self.shared.state()
    }

    /// Handle to `dispatch` and `state` for code that should not own the store
    pub fn dispatcher(&self) -> Dispatcher<S, A> {
        Dispatcher::new(Arc::clone(&self.shared))
    }

    /// Register a subscriber for future state changes
    ///
    /// The current state is not replayed; the first call happens after the
    /// next completed dispatch.
    ///
    /// Subscribers may dispatch through a captured [`Dispatcher`] or store
    /// clone. Such a dispatch runs to completion before the next subscriber is
    /// called. A subscriber has no way to return an error, so the `Result` of
    /// that dispatch must be handled inside the callback (logged or ignored);
    /// it never reaches the caller of the outer `dispatch`.
    ///
    /// A subscriber that captures a `Dispatcher` or `Store` keeps the store
    /// alive through a reference cycle until it is unsubscribed.
    pub fn subscribe<F>(&self, subscriber: F) -> Subscription<S>
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let id = self.shared.subscribers.lock().insert(Arc::new(subscriber));
        log::trace!("Subscribed {:?}", id);
        Subscription::new(id, &self.shared.subscribers)
    }

    /// Register a subscriber for a value derived from the state
    ///
    /// With `skip_repeats` enabled in the store config, the callback only runs
    /// when the selected value differs from the last one seen, starting from
    /// the value selected at subscription time.
    pub fn subscribe_selected<T, F, C>(&self, select: F, callback: C) -> Subscription<S>
    where
        T: PartialEq + Clone + Send + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
        C: Fn(&T) + Send + Sync + 'static,
    {
        let skip_repeats = self.shared.config.skip_repeats;
        let last = Mutex::new(skip_repeats.then(|| select(&self.state())));

        self.subscribe(move |state| {
            let selected = select(state);
            {
                let mut last = last.lock();
                if skip_repeats && last.as_ref() == Some(&selected) {
                    return;
                }
                *last = Some(selected.clone());
            }
            callback(&selected);
        })
    }

    /// Remove a subscriber; returns false if it was already removed
    /// or belongs to another store
    pub fn unsubscribe(&self, subscription: &Subscription<S>) -> bool {
        subscription.belongs_to(&self.shared.subscribers) && subscription.unsubscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.lock().len()
    }

    /// Snapshot of the middleware list
    pub fn middleware(&self) -> Vec<SharedMiddleware<S, A>> {
        self.shared.middleware.lock().clone()
    }

    /// Replace the middleware list
    ///
    /// Takes effect with the next dispatch; a chain that is already running
    /// keeps the middleware it was composed from.
    pub fn set_middleware(&self, middleware: Vec<SharedMiddleware<S, A>>) {
        self.update_middleware(|list| *list = middleware);
    }

    /// Append middleware to the end of the chain
    pub fn add_middleware<M: Middleware<S, A> + 'static>(&self, middleware: M) {
        self.update_middleware(|list| list.push(Arc::new(middleware)));
    }

    pub fn clear_middleware(&self) {
        self.update_middleware(Vec::clear);
    }

    /// Edit the middleware list in place
    pub fn update_middleware<F>(&self, update: F)
    where
        F: FnOnce(&mut Vec<SharedMiddleware<S, A>>),
    {
        let _gate = self.shared.gate.lock();
        let mut list = self.shared.middleware.lock().clone();
        update(&mut list);
        log::debug!("Middleware list updated ({} entries)", list.len());
        *self.shared.middleware.lock() = list;
    }

    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }
}

/// Builder for [`Store`], see [`Store::builder`]
pub struct StoreBuilder<S, A> {
    reducer: Reducer<S, A>,
    initial_state: S,
    middleware: Vec<SharedMiddleware<S, A>>,
    config: StoreConfig,
}

impl<S, A> StoreBuilder<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: fmt::Debug + Send + 'static,
{
    fn new(reducer: Reducer<S, A>, initial_state: S) -> Self {
        Self {
            reducer,
            initial_state,
            middleware: Vec::new(),
            config: StoreConfig::default(),
        }
    }

    /// Append middleware; the first one added sees actions first
    pub fn middleware<M: Middleware<S, A> + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn middleware_list(mut self, middleware: Vec<SharedMiddleware<S, A>>) -> Self {
        self.middleware.extend(middleware);
        self
    }

    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Store<S, A> {
        log::debug!(
            "Creating store with {} middleware (max dispatch depth {:?})",
            self.middleware.len(),
            self.config.max_dispatch_depth
        );
        Store {
            shared: Arc::new(Shared {
                gate: ReentrantMutex::new(DispatchFrame::default()),
                state: Mutex::new(Arc::new(self.initial_state)),
                reducer: self.reducer,
                middleware: Mutex::new(self.middleware),
                subscribers: Arc::new(Mutex::new(Subscribers::new())),
                config: self.config,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    enum Action {
        Set(String),
        Append(String),
    }

    fn reduce(action: &Action, state: &String) -> String {
        match action {
            Action::Set(value) => value.clone(),
            Action::Append(value) => format!("{}{}", state, value),
        }
    }

    #[test]
    fn test_store_dispatch_replaces_state() {
        let store = Store::new(reduce, String::new(), Vec::new());

        store.dispatch(Action::Set("a".into())).unwrap();
        store.dispatch(Action::Append("b".into())).unwrap();

        assert_eq!(store.state(), "ab");
    }

    #[test]
    fn test_clones_share_state() {
        let store = Store::new(reduce, String::new(), Vec::new());
        let other = store.clone();

        other.dispatch(Action::Set("shared".into())).unwrap();

        assert_eq!(store.state(), "shared");
    }

    #[test]
    fn test_dispatcher_handle_dispatches() {
        let store = Store::new(reduce, String::new(), Vec::new());
        let dispatcher = store.dispatcher();

        dispatcher.dispatch(Action::Set("via handle".into())).unwrap();

        assert_eq!(dispatcher.state(), "via handle");
        assert_eq!(store.state(), "via handle");
    }

    #[test]
    fn test_depth_restored_after_error() {
        let store = Store::builder(reduce, String::new())
            .config(StoreConfig {
                max_dispatch_depth: Some(2),
                ..StoreConfig::default()
            })
            .build();
        // Re-dispatches every Append, so it recurses until the limit trips
        store.add_middleware(middleware::from_fn::<String, Action, _>(
            |action, dispatcher, next| match action {
                Action::Append(value) => dispatcher.dispatch(Action::Append(value)),
                other => next.call(other),
            },
        ));

        let err = store.dispatch(Action::Append("x".into())).unwrap_err();
        assert!(matches!(err, StoreError::DispatchDepthExceeded { limit: 2 }));

        // The frame was unwound, so a plain dispatch still works
        store.dispatch(Action::Set("ok".into())).unwrap();
        assert_eq!(store.state(), "ok");
    }

    #[test]
    fn test_update_middleware_can_read_store() {
        let store = Store::new(reduce, String::new(), Vec::new());
        store.add_middleware(middleware::LoggingMiddleware::new());

        let store_ref = store.clone();
        store.update_middleware(|list| {
            // Reading the list again must not deadlock
            assert_eq!(store_ref.middleware().len(), list.len());
            list.clear();
        });

        assert!(store.middleware().is_empty());
    }

    #[test]
    fn test_subscriber_count() {
        let store = Store::new(reduce, String::new(), Vec::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(store.subscriber_count(), 1);

        store.dispatch(Action::Set("a".into())).unwrap();
        assert!(store.unsubscribe(&subscription));
        store.dispatch(Action::Set("b".into())).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_debug_output() {
        let store = Store::new(reduce, String::new(), Vec::new());
        let debug = format!("{:?}", store);
        assert!(debug.starts_with("Store"));
        assert!(debug.contains("middleware: 0"));
    }
}
