//! Dispatch pipeline composition
//!
//! The chain is composed fresh for every dispatch from the middleware list
//! as it is at that moment, so list mutations apply to the next dispatch
//! (nested ones included) and never to a chain that is already running.

use crate::middleware::{Dispatcher, Next, SharedMiddleware};
use std::sync::Arc;

/// Wrap `terminal` in `middleware`, last entry innermost
///
/// For `[m0, m1, m2]` the result runs `m0`, then `m1`, then `m2`, then the
/// terminal step, each stage deciding whether to continue.
pub(crate) fn compose<S, A>(
    middleware: &[SharedMiddleware<S, A>],
    dispatcher: &Dispatcher<S, A>,
    terminal: Next<A>,
) -> Next<A>
where
    S: Send + Sync + 'static,
    A: Send + 'static,
{
    middleware.iter().rev().fold(terminal, |next, middleware| {
        let middleware = Arc::clone(middleware);
        let dispatcher = dispatcher.clone();
        Next::new(move |action| middleware.handle(action, &dispatcher, &next))
    })
}
