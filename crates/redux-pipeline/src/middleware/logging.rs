//! LoggingMiddleware - logs all actions for debugging

use super::{Dispatcher, Middleware, Next};
use crate::error::StoreError;
use std::fmt::Debug;

/// LoggingMiddleware - logs every action that passes through the chain
///
/// Always forwards the action unchanged. Place it first to see actions as
/// dispatched, or last to see them as rewritten by earlier middleware.
#[derive(Debug, Clone, Copy)]
pub struct LoggingMiddleware {
    level: log::Level,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self::with_level(log::Level::Debug)
    }

    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A: Debug> Middleware<S, A> for LoggingMiddleware {
    fn handle(
        &self,
        action: A,
        _dispatcher: &Dispatcher<S, A>,
        next: &Next<A>,
    ) -> Result<(), StoreError> {
        log::log!(self.level, "Action: {:?}", action);
        next.call(action)
    }
}
