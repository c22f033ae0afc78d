//! Middleware system
//!
//! Middleware sits between `dispatch` and the reducer, allowing side effects,
//! logging, validation and action rewriting to be handled in a composable way.
//!
//! ## Design
//!
//! ```text
//! dispatch(action) → m0 → m1 → … → mN-1 → reducer → state → subscribers
//! ```
//!
//! Each middleware receives the action together with a [`Dispatcher`] and the
//! [`Next`] continuation. It can:
//! - Inspect the action and the current state
//! - Pass the action on with `next.call(action)`, possibly rewritten
//! - Call `next` several times, or not at all to swallow the action
//! - Dispatch new actions, which run through the whole chain before returning
//!
//! ## Example
//!
//! ```rust
//! use redux_pipeline::{Dispatcher, Middleware, Next, StoreError};
//!
//! #[derive(Debug)]
//! enum Action {
//!     Rename(String),
//!     Reset,
//! }
//!
//! struct ShoutMiddleware;
//!
//! impl<S> Middleware<S, Action> for ShoutMiddleware {
//!     fn handle(
//!         &self,
//!         action: Action,
//!         _dispatcher: &Dispatcher<S, Action>,
//!         next: &Next<Action>,
//!     ) -> Result<(), StoreError> {
//!         match action {
//!             Action::Rename(name) => next.call(Action::Rename(name.to_uppercase())),
//!             other => next.call(other),
//!         }
//!     }
//! }
//! ```

use crate::error::StoreError;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

mod dispatcher;
mod logging;

pub use dispatcher::Dispatcher;
pub use logging::LoggingMiddleware;

/// Middleware trait - intercepts actions before they reach the reducer
///
/// Middleware is called in list order for each action: the first entry of the
/// store's middleware list sees the action first.
pub trait Middleware<S, A>: Send + Sync {
    /// Handle an action
    ///
    /// - `action`: The action to process (owned; forward it or a replacement)
    /// - `dispatcher`: Dispatch new actions or read the current state
    /// - `next`: The rest of the chain, ending in the reducer
    ///
    /// Errors propagate unchanged to the original `dispatch` caller.
    fn handle(
        &self,
        action: A,
        dispatcher: &Dispatcher<S, A>,
        next: &Next<A>,
    ) -> Result<(), StoreError>;
}

/// Middleware as stored in the store's list
pub type SharedMiddleware<S, A> = Arc<dyn Middleware<S, A>>;

type Continuation<A> = Arc<dyn Fn(A) -> Result<(), StoreError> + Send + Sync>;

/// The remainder of the middleware chain for one dispatch
pub struct Next<A> {
    continuation: Continuation<A>,
}

impl<A> Next<A> {
    pub(crate) fn new<F>(continuation: F) -> Self
    where
        F: Fn(A) -> Result<(), StoreError> + Send + Sync + 'static,
    {
        Self {
            continuation: Arc::new(continuation),
        }
    }

    /// Hand an action to the next middleware (or the reducer, at the end of the chain)
    pub fn call(&self, action: A) -> Result<(), StoreError> {
        (self.continuation)(action)
    }
}

impl<A> Clone for Next<A> {
    fn clone(&self) -> Self {
        Self {
            continuation: Arc::clone(&self.continuation),
        }
    }
}

impl<A> fmt::Debug for Next<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// Middleware built from a closure, see [`from_fn`]
pub struct FnMiddleware<S, A, F> {
    handler: F,
    _types: PhantomData<fn(S, A)>,
}

/// Build middleware from a closure
///
/// The state and action types usually need to be spelled out so the closure's
/// arguments can be inferred:
///
/// ```rust
/// use redux_pipeline::{middleware, Store};
///
/// let store = Store::new(|action: &i64, state: &i64| state + action, 0, Vec::new());
/// store.add_middleware(middleware::from_fn::<i64, i64, _>(|action, _dispatcher, next| {
///     next.call(action.max(0))
/// }));
///
/// store.dispatch(-5).unwrap();
/// store.dispatch(3).unwrap();
/// assert_eq!(store.state(), 3);
/// ```
pub fn from_fn<S, A, F>(handler: F) -> FnMiddleware<S, A, F>
where
    F: Fn(A, &Dispatcher<S, A>, &Next<A>) -> Result<(), StoreError> + Send + Sync,
{
    FnMiddleware {
        handler,
        _types: PhantomData,
    }
}

impl<S, A, F> Middleware<S, A> for FnMiddleware<S, A, F>
where
    F: Fn(A, &Dispatcher<S, A>, &Next<A>) -> Result<(), StoreError> + Send + Sync,
{
    fn handle(
        &self,
        action: A,
        dispatcher: &Dispatcher<S, A>,
        next: &Next<A>,
    ) -> Result<(), StoreError> {
        (self.handler)(action, dispatcher, next)
    }
}
