//! Errors surfaced by `Store::dispatch`

use thiserror::Error;

/// Errors that can occur while dispatching an action
///
/// Nothing inside the store catches these: they propagate to whichever
/// `dispatch` call the application made.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The reducer failed; the state was left untouched.
    #[error("Reducer failed: {0:#}")]
    Reducer(#[source] anyhow::Error),

    /// A middleware failed while handling an action.
    #[error("Middleware failed: {0:#}")]
    Middleware(#[source] anyhow::Error),

    /// `dispatch` was called while the reducer was computing the next state.
    #[error("Cannot dispatch while the reducer is running")]
    DispatchDuringReduce,

    /// Nested dispatches went deeper than the configured limit.
    #[error("Dispatch depth limit of {limit} exceeded")]
    DispatchDepthExceeded { limit: usize },
}

impl StoreError {
    /// Wrap any error raised inside a middleware
    pub fn middleware(error: impl Into<anyhow::Error>) -> Self {
        Self::Middleware(error.into())
    }
}
