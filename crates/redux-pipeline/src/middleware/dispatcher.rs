//! Dispatcher allows middleware to dispatch actions back to the store

use crate::error::StoreError;
use crate::store::Shared;
use std::fmt;
use std::sync::Arc;

/// Dispatcher - the `dispatch`/`state` handle given to middleware
///
/// Actions dispatched here re-enter the middleware chain from the beginning,
/// rebuilt from the store's middleware list at the moment of the call. The
/// nested dispatch runs to completion (reducer and subscriber notifications)
/// before `dispatch` returns, so code after the call observes its effects.
///
/// A dispatcher keeps its store alive. Middleware that stores one in its own
/// fields, or a subscriber closure that captures one, creates a reference
/// cycle; clear the middleware list or unsubscribe to break it.
pub struct Dispatcher<S, A> {
    shared: Arc<Shared<S, A>>,
}

impl<S, A> Clone for Dispatcher<S, A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S, A> fmt::Debug for Dispatcher<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl<S, A> Dispatcher<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: fmt::Debug + Send + 'static,
{
    pub(crate) fn new(shared: Arc<Shared<S, A>>) -> Self {
        Self { shared }
    }

    /// Dispatch an action through the full middleware chain
    pub fn dispatch(&self, action: A) -> Result<(), StoreError> {
        Shared::dispatch(&self.shared, action)
    }

    /// Current state at the instant of the call
    ///
    /// Reflects every dispatch that has completed so far, including nested
    /// dispatches issued by the middleware currently running.
    pub fn state(&self) -> S {
        self.shared.state()
    }
}
